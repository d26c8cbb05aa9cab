use async_trait::async_trait;
use log::info;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::datetime::{self, time_estimate_to_millis, DateSpec};
use crate::error::{Error, Result};
use crate::filters::{adjust_numeric_list, adjust_string_list, bool_query, FillerSource, RandomFiller};
use crate::statuses::StatusSet;
use crate::time_entry::i64_from_number_or_string;

/// ClickUp API v2のデフォルトURL。
pub const API_DEFAULT_URL: &str = "https://app.clickup.com/api/v2/";

/// `order_by`クエリで選択できるフィールド。
const ORDER_BY_CHOICES: [&str; 4] = ["id", "created", "updated", "due_date"];

/// workspace一覧エンドポイントのレスポンス。
#[derive(Clone, Debug, Deserialize)]
pub struct WorkspacesResponse {
    pub teams: Vec<Workspace>,
}

/// トークンで認可されたworkspace(team)。
#[derive(Clone, Debug, Deserialize)]
pub struct Workspace {
    #[serde(deserialize_with = "i64_from_number_or_string")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// workspaceのメンバー。
#[derive(Clone, Debug, Deserialize)]
pub struct Member {
    pub user: MemberUser,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MemberUser {
    pub id: i64,
    pub username: String,
}

/// タスク一覧取得のフィルタ条件。
///
/// 1要素のリストフィルタは送信前にランダム値で穴埋めされる。
#[derive(Clone, Debug)]
pub struct TasksQuery {
    pub archived: bool,
    pub include_markdown_description: bool,
    pub page: u32,
    pub order_by: String,
    pub reverse: bool,
    pub subtasks: bool,
    pub statuses: Vec<String>,
    pub include_closed: bool,
    pub assignees: Vec<String>,
    pub tags: Vec<String>,
    pub due_date_gt: Option<DateSpec>,
    pub due_date_lt: Option<DateSpec>,
    pub date_created_gt: Option<DateSpec>,
    pub date_created_lt: Option<DateSpec>,
    pub date_updated_gt: Option<DateSpec>,
    pub date_updated_lt: Option<DateSpec>,
    pub date_done_gt: Option<DateSpec>,
    pub date_done_lt: Option<DateSpec>,
    pub custom_fields: Vec<String>,
    pub custom_items: Vec<i64>,
}

impl Default for TasksQuery {
    fn default() -> Self {
        Self {
            archived: false,
            include_markdown_description: false,
            page: 0,
            order_by: "created".to_string(),
            reverse: false,
            subtasks: false,
            statuses: vec![],
            include_closed: false,
            assignees: vec![],
            tags: vec![],
            due_date_gt: None,
            due_date_lt: None,
            date_created_gt: None,
            date_created_lt: None,
            date_updated_gt: None,
            date_updated_lt: None,
            date_done_gt: None,
            date_done_lt: None,
            custom_fields: vec![],
            custom_items: vec![],
        }
    }
}

/// time entries取得のフィルタ条件。
///
/// 開始・終了日時を省略した場合は当月1日から現在時刻までが対象になる。
#[derive(Clone, Debug, Default)]
pub struct TimeEntriesQuery {
    pub start_date: Option<DateSpec>,
    pub end_date: Option<DateSpec>,
    pub assignees: Vec<i64>,
    pub include_task_tags: bool,
    pub include_location_names: bool,
    pub space_id: Option<i64>,
    pub folder_id: Option<i64>,
    pub list_id: Option<i64>,
    pub task_id: Option<String>,
    pub custom_task_ids: bool,
    pub query_team_id: Option<i64>,
}

/// タスク作成リクエストのペイロード。
#[derive(Clone, Debug, Default)]
pub struct CreateTaskRequest {
    pub name: String,
    pub custom_task_ids: bool,
    pub team_id: Option<i64>,
    pub description: Option<String>,
    pub parent: Option<String>,
    pub assignees: Vec<i64>,
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub priority: Option<i64>,
    pub due_date: Option<DateSpec>,
    pub due_date_time: bool,
    pub time_estimate: Option<Vec<i64>>,
    pub start_date: Option<DateSpec>,
    pub start_date_time: bool,
    pub notify_all: bool,
    pub links_to: Option<String>,
    pub check_required_custom_fields: bool,
    pub custom_item_id: Option<i64>,
}

/// タスク更新リクエストのペイロード。
///
/// assigneeは追加と削除を別々のリストで指定する。
#[derive(Clone, Debug, Default)]
pub struct UpdateTaskRequest {
    pub custom_task_ids: bool,
    pub team_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent: Option<String>,
    pub assignees_to_add: Vec<i64>,
    pub assignees_to_remove: Vec<i64>,
    pub status: Option<String>,
    pub priority: Option<i64>,
    pub due_date: Option<DateSpec>,
    pub due_date_time: bool,
    pub time_estimate: Option<Vec<i64>>,
    pub start_date: Option<DateSpec>,
    pub start_date_time: bool,
    pub archived: bool,
}

/// checklist item編集リクエストのペイロード。
///
/// nameとassigneeを省略した場合は`task_id`のタスクから現在値を補完する。
#[derive(Clone, Debug, Default)]
pub struct EditChecklistItemRequest {
    pub task_id: String,
    pub name: Option<String>,
    pub assignee: Option<i64>,
    pub remove_assignee: bool,
    pub resolved: bool,
    pub parent: Option<String>,
}

/// コメント作成リクエストのペイロード。
#[derive(Clone, Debug, Default)]
pub struct CommentRequest {
    pub comment_text: String,
    pub assignee: Option<i64>,
    pub notify_all: bool,
}

/// ClickUp APIと通信するためのクライアント。
///
/// # Examples
///
/// ```
/// use clickup_tools::client::ClickUpClient;
///
/// let client = ClickUpClient::new("pk_12345678", None).unwrap();
/// assert_eq!(client.api_url(), "https://app.clickup.com/api/v2/");
/// ```
pub struct ClickUpClient {
    client: Client,
    api_url: String,
    token: String,
    filler: Box<dyn FillerSource + Send + Sync>,
    statuses: Option<StatusSet>,
}

impl ClickUpClient {
    /// 新しい`ClickUpClient`を返す。
    ///
    /// # Arguments
    ///
    /// * `token` - ClickUpのpersonal API token
    /// * `api_url` - APIのベースURL。`None`の場合はデフォルトURLを使う
    pub fn new(token: &str, api_url: Option<&str>) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::InvalidValue(
                "Empty string is not allowed for a token.".to_string(),
            ));
        }

        let api_url = match api_url {
            None => API_DEFAULT_URL.to_string(),
            Some(url) => {
                Url::parse(url).map_err(|_| {
                    Error::InvalidValue(format!("'{}' is not a valid URL address.", url))
                })?;
                if url.ends_with('/') {
                    url.to_string()
                } else {
                    format!("{}/", url)
                }
            }
        };

        Ok(Self {
            client: Client::new(),
            api_url,
            token: token.to_string(),
            filler: Box::new(RandomFiller),
            statuses: None,
        })
    }

    /// フィルタリストの穴埋めに使う生成元を差し替える。
    pub fn with_filler(mut self, filler: Box<dyn FillerSource + Send + Sync>) -> Self {
        self.filler = filler;
        self
    }

    /// `statuses`フィルタの検証に使うステータス集合を設定する。
    pub fn with_status_set(mut self, statuses: StatusSet) -> Self {
        self.statuses = Some(statuses);
        self
    }

    /// 正規化済みのAPIベースURLを返す。
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// リクエストを送信してJSONボディを返す。
    ///
    /// HTTPエラーステータスでもボディをそのまま返す。認可エラーの判定は
    /// 呼び出し元がボディの構造で行う。
    async fn request_json(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value> {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.api_url, path))
            .header(AUTHORIZATION, &self.token)
            .header(CONTENT_TYPE, "application/json")
            .query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        Ok(response.json::<Value>().await?)
    }

    /// リクエストを送信してステータスコードのみを返す。
    async fn request_status(&self, method: Method, path: &str) -> Result<StatusCode> {
        let response = self
            .client
            .request(method, format!("{}{}", self.api_url, path))
            .header(AUTHORIZATION, &self.token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        Ok(response.status())
    }

    /// 認可されたユーザーの情報を取得する。
    pub async fn get_authorized_user(&self) -> Result<Value> {
        self.request_json(Method::GET, "user/", &[], None).await
    }

    /// トークンで認可されたworkspace一覧を取得する。
    pub async fn get_authorized_workspaces(&self) -> Result<WorkspacesResponse> {
        let body = self.request_json(Method::GET, "team/", &[], None).await?;
        let workspaces: WorkspacesResponse = serde_json::from_value(body)?;
        info!("number of authorized workspaces: {}", workspaces.teams.len());

        Ok(workspaces)
    }

    /// workspace内のuser group一覧を取得する。
    pub async fn get_user_groups(
        &self,
        team_id: Option<i64>,
        group_ids: Option<&str>,
    ) -> Result<Value> {
        let mut query = Vec::new();
        if let Some(team_id) = team_id {
            query.push(("team_id".to_string(), team_id.to_string()));
        }
        if let Some(group_ids) = group_ids {
            query.push(("group_ids".to_string(), group_ids.to_string()));
        }

        self.request_json(Method::GET, "group", &query, None).await
    }

    /// workspace内のspace一覧を取得する。
    pub async fn get_spaces(&self, team_id: i64) -> Result<Value> {
        self.request_json(Method::GET, &format!("team/{}/space", team_id), &[], None)
            .await
    }

    /// spaceの詳細を取得する。
    pub async fn get_space(&self, space_id: i64) -> Result<Value> {
        self.request_json(Method::GET, &format!("space/{}", space_id), &[], None)
            .await
    }

    /// space内のfolder一覧を取得する。
    pub async fn get_folders(&self, space_id: i64, archived: bool) -> Result<Value> {
        let query = vec![("archived".to_string(), bool_query(archived).to_string())];

        self.request_json(
            Method::GET,
            &format!("space/{}/folder", space_id),
            &query,
            None,
        )
        .await
    }

    /// folderの詳細を取得する。
    pub async fn get_folder(&self, folder_id: i64) -> Result<Value> {
        self.request_json(Method::GET, &format!("folder/{}", folder_id), &[], None)
            .await
    }

    /// folder内のlist一覧を取得する。
    pub async fn get_lists(&self, folder_id: i64, archived: bool) -> Result<Value> {
        let query = vec![("archived".to_string(), bool_query(archived).to_string())];

        self.request_json(
            Method::GET,
            &format!("folder/{}/list", folder_id),
            &query,
            None,
        )
        .await
    }

    /// listの詳細を取得する。
    pub async fn get_list(&self, list_id: i64) -> Result<Value> {
        self.request_json(Method::GET, &format!("list/{}", list_id), &[], None)
            .await
    }

    /// folderに属さないlist一覧を取得する。
    pub async fn get_folderless_lists(&self, space_id: i64, archived: bool) -> Result<Value> {
        let query = vec![("archived".to_string(), bool_query(archived).to_string())];

        self.request_json(
            Method::GET,
            &format!("space/{}/list", space_id),
            &query,
            None,
        )
        .await
    }

    /// list内のタスク一覧をフィルタ条件付きで取得する。
    ///
    /// # Arguments
    ///
    /// * `list_id` - タスクを取得するlistのID
    /// * `query` - フィルタ条件
    pub async fn get_tasks(&self, list_id: i64, query: &TasksQuery) -> Result<Value> {
        if !ORDER_BY_CHOICES.contains(&query.order_by.as_str()) {
            return Err(Error::InvalidValue(format!(
                "Invalid 'order_by' field choice. Allowed choices are: {}.",
                ORDER_BY_CHOICES.join(", "),
            )));
        }
        if !query.custom_fields.is_empty() {
            return Err(Error::CustomFieldsUnsupported);
        }
        if let Some(statuses) = &self.statuses {
            statuses.validate(&query.statuses)?;
        }

        let mut params = vec![
            ("archived".to_string(), bool_query(query.archived).to_string()),
            (
                "include_markdown_description".to_string(),
                bool_query(query.include_markdown_description).to_string(),
            ),
            ("page".to_string(), query.page.to_string()),
            ("order_by".to_string(), query.order_by.clone()),
            ("reverse".to_string(), bool_query(query.reverse).to_string()),
            (
                "include_closed".to_string(),
                bool_query(query.include_closed).to_string(),
            ),
        ];
        // falseを送信するとsubtasksが除外されるため、trueの場合のみ付与する。
        if query.subtasks {
            params.push(("subtasks".to_string(), "true".to_string()));
        }
        for status in adjust_string_list(query.statuses.clone(), self.filler.as_ref()) {
            params.push(("statuses".to_string(), status));
        }
        for assignee in adjust_string_list(query.assignees.clone(), self.filler.as_ref()) {
            params.push(("assignees".to_string(), assignee));
        }
        for tag in adjust_string_list(query.tags.clone(), self.filler.as_ref()) {
            params.push(("tags".to_string(), tag));
        }
        for custom_item in adjust_numeric_list(query.custom_items.clone(), self.filler.as_ref()) {
            params.push(("custom_items".to_string(), custom_item.to_string()));
        }
        push_date(&mut params, "due_date_gt", &query.due_date_gt)?;
        push_date(&mut params, "due_date_lt", &query.due_date_lt)?;
        push_date(&mut params, "date_created_gt", &query.date_created_gt)?;
        push_date(&mut params, "date_created_lt", &query.date_created_lt)?;
        push_date(&mut params, "date_updated_gt", &query.date_updated_gt)?;
        push_date(&mut params, "date_updated_lt", &query.date_updated_lt)?;
        push_date(&mut params, "date_done_gt", &query.date_done_gt)?;
        push_date(&mut params, "date_done_lt", &query.date_done_lt)?;

        self.request_json(
            Method::GET,
            &format!("list/{}/task", list_id),
            &params,
            None,
        )
        .await
    }

    /// タスクの詳細を取得する。
    pub async fn get_task(
        &self,
        task_id: &str,
        custom_task_ids: bool,
        team_id: Option<i64>,
        include_subtasks: bool,
        include_markdown_description: bool,
    ) -> Result<Value> {
        let mut query = vec![
            (
                "custom_task_ids".to_string(),
                custom_ids_query(custom_task_ids, team_id),
            ),
            (
                "include_subtasks".to_string(),
                bool_query(include_subtasks).to_string(),
            ),
            (
                "include_markdown_description".to_string(),
                bool_query(include_markdown_description).to_string(),
            ),
        ];
        if let Some(team_id) = team_id {
            query.push(("team_id".to_string(), team_id.to_string()));
        }

        self.request_json(Method::GET, &format!("task/{}", task_id), &query, None)
            .await
    }

    /// workspaceメンバーの詳細を取得する。
    pub async fn get_user(&self, team_id: i64, user_id: i64) -> Result<Value> {
        self.request_json(
            Method::GET,
            &format!("team/{}/user/{}", team_id, user_id),
            &[],
            None,
        )
        .await
    }

    /// workspace内のtime entries一覧を取得する。
    ///
    /// レスポンスは認可エラー時に`data`フィールドを持たないため、
    /// 構造を検証せずJSONのまま返す。
    pub async fn get_time_entries(
        &self,
        team_id: i64,
        query: &TimeEntriesQuery,
    ) -> Result<Value> {
        let start_date = match &query.start_date {
            Some(date) => date.to_unix_millis()?,
            None => first_day_of_current_month_millis()?,
        };
        let end_date = match &query.end_date {
            Some(date) => date.to_unix_millis()?,
            None => datetime::now().timestamp_millis(),
        };

        let mut params = vec![
            ("start_date".to_string(), start_date.to_string()),
            ("end_date".to_string(), end_date.to_string()),
            (
                "include_task_tags".to_string(),
                bool_query(query.include_task_tags).to_string(),
            ),
            (
                "include_location_names".to_string(),
                bool_query(query.include_location_names).to_string(),
            ),
            (
                "custom_task_ids".to_string(),
                custom_ids_query(query.custom_task_ids, query.query_team_id),
            ),
        ];
        if !query.assignees.is_empty() {
            let assignees = query
                .assignees
                .iter()
                .map(i64::to_string)
                .collect::<Vec<String>>()
                .join(",");
            params.push(("assignee".to_string(), assignees));
        }
        if let Some(space_id) = query.space_id {
            params.push(("space_id".to_string(), space_id.to_string()));
        }
        if let Some(folder_id) = query.folder_id {
            params.push(("folder_id".to_string(), folder_id.to_string()));
        }
        if let Some(list_id) = query.list_id {
            params.push(("list_id".to_string(), list_id.to_string()));
        }
        if let Some(task_id) = &query.task_id {
            params.push(("task_id".to_string(), task_id.clone()));
        }
        if let Some(query_team_id) = query.query_team_id {
            params.push(("team_id".to_string(), query_team_id.to_string()));
        }

        self.request_json(
            Method::GET,
            &format!("team/{}/time_entries", team_id),
            &params,
            None,
        )
        .await
    }

    /// タスクのコメント一覧を取得する。
    pub async fn get_task_comments(
        &self,
        task_id: &str,
        custom_task_ids: bool,
        team_id: Option<i64>,
        start: Option<&DateSpec>,
        start_id: Option<&str>,
    ) -> Result<Value> {
        let mut query = vec![(
            "custom_task_ids".to_string(),
            custom_ids_query(custom_task_ids, team_id),
        )];
        if let Some(team_id) = team_id {
            query.push(("team_id".to_string(), team_id.to_string()));
        }
        push_comment_paging(&mut query, start, start_id)?;

        self.request_json(
            Method::GET,
            &format!("task/{}/comment", task_id),
            &query,
            None,
        )
        .await
    }

    /// listのコメント一覧を取得する。
    pub async fn get_list_comments(
        &self,
        list_id: i64,
        start: Option<&DateSpec>,
        start_id: Option<&str>,
    ) -> Result<Value> {
        let mut query = Vec::new();
        push_comment_paging(&mut query, start, start_id)?;

        self.request_json(
            Method::GET,
            &format!("list/{}/comment", list_id),
            &query,
            None,
        )
        .await
    }

    /// chat viewのコメント一覧を取得する。
    pub async fn get_chat_view_comments(
        &self,
        view_id: &str,
        start: Option<&DateSpec>,
        start_id: Option<&str>,
    ) -> Result<Value> {
        let mut query = Vec::new();
        push_comment_paging(&mut query, start, start_id)?;

        self.request_json(
            Method::GET,
            &format!("view/{}/comment", view_id),
            &query,
            None,
        )
        .await
    }

    /// workspaceで定義されたカスタムタスク種別の一覧を取得する。
    pub async fn get_custom_task_types(&self, team_id: i64) -> Result<Value> {
        self.request_json(
            Method::GET,
            &format!("team/{}/custom_item", team_id),
            &[],
            None,
        )
        .await
    }

    /// listで利用できるカスタムフィールドの一覧を取得する。
    pub async fn get_accessible_custom_fields(&self, list_id: i64) -> Result<Value> {
        self.request_json(Method::GET, &format!("list/{}/field", list_id), &[], None)
            .await
    }

    /// listに新しいタスクを作成する。
    pub async fn create_task(&self, list_id: i64, request: &CreateTaskRequest) -> Result<Value> {
        if let (Some(statuses), Some(status)) = (&self.statuses, &request.status) {
            statuses.validate(std::slice::from_ref(status))?;
        }

        let mut query = vec![(
            "custom_task_ids".to_string(),
            custom_ids_query(request.custom_task_ids, request.team_id),
        )];
        if let Some(team_id) = request.team_id {
            query.push(("team_id".to_string(), team_id.to_string()));
        }

        let mut payload = Map::new();
        payload.insert("name".to_string(), json!(request.name));
        insert_opt(&mut payload, "description", request.description.as_deref());
        insert_opt(&mut payload, "parent", request.parent.as_deref());
        if !request.assignees.is_empty() {
            payload.insert("assignees".to_string(), json!(request.assignees));
        }
        if !request.tags.is_empty() {
            payload.insert("tags".to_string(), json!(request.tags));
        }
        insert_opt(&mut payload, "status", request.status.as_deref());
        if let Some(priority) = request.priority {
            payload.insert("priority".to_string(), json!(priority));
        }
        if let Some(due_date) = &request.due_date {
            payload.insert("due_date".to_string(), json!(due_date.to_unix_millis()?));
        }
        payload.insert(
            "due_date_time".to_string(),
            json!(bool_query(request.due_date_time)),
        );
        if let Some(estimate) = &request.time_estimate {
            payload.insert(
                "time_estimate".to_string(),
                json!(time_estimate_to_millis(estimate)?),
            );
        }
        if let Some(start_date) = &request.start_date {
            payload.insert("start_date".to_string(), json!(start_date.to_unix_millis()?));
        }
        payload.insert(
            "start_date_time".to_string(),
            json!(bool_query(request.start_date_time)),
        );
        payload.insert(
            "notify_all".to_string(),
            json!(bool_query(request.notify_all)),
        );
        insert_opt(&mut payload, "links_to", request.links_to.as_deref());
        payload.insert(
            "check_required_custom_fields".to_string(),
            json!(bool_query(request.check_required_custom_fields)),
        );
        if let Some(custom_item_id) = request.custom_item_id {
            payload.insert("custom_item_id".to_string(), json!(custom_item_id));
        }

        self.request_json(
            Method::POST,
            &format!("list/{}/task", list_id),
            &query,
            Some(Value::Object(payload)),
        )
        .await
    }

    /// タスクを更新する。
    pub async fn update_task(&self, task_id: &str, request: &UpdateTaskRequest) -> Result<Value> {
        if let (Some(statuses), Some(status)) = (&self.statuses, &request.status) {
            statuses.validate(std::slice::from_ref(status))?;
        }

        let mut query = vec![(
            "custom_task_ids".to_string(),
            custom_ids_query(request.custom_task_ids, request.team_id),
        )];
        if let Some(team_id) = request.team_id {
            query.push(("team_id".to_string(), team_id.to_string()));
        }

        let mut payload = Map::new();
        insert_opt(&mut payload, "name", request.name.as_deref());
        insert_opt(&mut payload, "description", request.description.as_deref());
        insert_opt(&mut payload, "parent", request.parent.as_deref());
        if !request.assignees_to_add.is_empty() || !request.assignees_to_remove.is_empty() {
            payload.insert(
                "assignees".to_string(),
                json!({
                    "add": request.assignees_to_add,
                    "rem": request.assignees_to_remove,
                }),
            );
        }
        insert_opt(&mut payload, "status", request.status.as_deref());
        if let Some(priority) = request.priority {
            payload.insert("priority".to_string(), json!(priority));
        }
        if let Some(due_date) = &request.due_date {
            payload.insert("due_date".to_string(), json!(due_date.to_unix_millis()?));
        }
        payload.insert(
            "due_date_time".to_string(),
            json!(bool_query(request.due_date_time)),
        );
        if let Some(estimate) = &request.time_estimate {
            payload.insert(
                "time_estimate".to_string(),
                json!(time_estimate_to_millis(estimate)?),
            );
        }
        if let Some(start_date) = &request.start_date {
            payload.insert("start_date".to_string(), json!(start_date.to_unix_millis()?));
        }
        payload.insert(
            "start_date_time".to_string(),
            json!(bool_query(request.start_date_time)),
        );
        payload.insert("archived".to_string(), json!(bool_query(request.archived)));

        self.request_json(
            Method::PUT,
            &format!("task/{}", task_id),
            &query,
            Some(Value::Object(payload)),
        )
        .await
    }

    /// タスクにchecklistを作成する。
    pub async fn create_checklist(
        &self,
        task_id: &str,
        name: &str,
        custom_task_ids: bool,
        team_id: Option<i64>,
    ) -> Result<Value> {
        let mut query = vec![(
            "custom_task_ids".to_string(),
            custom_ids_query(custom_task_ids, team_id),
        )];
        if let Some(team_id) = team_id {
            query.push(("team_id".to_string(), team_id.to_string()));
        }

        self.request_json(
            Method::POST,
            &format!("task/{}/checklist", task_id),
            &query,
            Some(json!({"name": name})),
        )
        .await
    }

    /// checklistの名前と位置を更新する。
    pub async fn edit_checklist(
        &self,
        checklist_id: &str,
        name: Option<&str>,
        position: Option<i64>,
    ) -> Result<Value> {
        let mut payload = Map::new();
        insert_opt(&mut payload, "name", name);
        if let Some(position) = position {
            payload.insert("position".to_string(), json!(position));
        }

        self.request_json(
            Method::PUT,
            &format!("checklist/{}", checklist_id),
            &[],
            Some(Value::Object(payload)),
        )
        .await
    }

    /// checklistに新しいitemを作成する。
    pub async fn create_checklist_item(
        &self,
        checklist_id: &str,
        name: &str,
        assignee: Option<i64>,
    ) -> Result<Value> {
        let mut payload = Map::new();
        payload.insert("name".to_string(), json!(name));
        if let Some(assignee) = assignee {
            payload.insert("assignee".to_string(), json!(assignee));
        }

        self.request_json(
            Method::POST,
            &format!("checklist/{}/checklist_item", checklist_id),
            &[],
            Some(Value::Object(payload)),
        )
        .await
    }

    /// checklist itemを編集する。
    ///
    /// このエンドポイントは省略されたフィールドを削除として扱うため、
    /// nameまたはassigneeが未指定の場合はタスクの現在値で補完する。
    pub async fn edit_checklist_item(
        &self,
        checklist_id: &str,
        checklist_item_id: &str,
        request: &EditChecklistItemRequest,
    ) -> Result<Value> {
        let mut name = request.name.clone();
        let mut assignee = request.assignee;
        let remove_assignee = if assignee.is_some() {
            false
        } else {
            request.remove_assignee
        };

        if name.is_none() || (assignee.is_none() && !remove_assignee) {
            let task = self
                .get_task(&request.task_id, false, None, false, false)
                .await?;
            let item = find_checklist_item(&task, checklist_id, checklist_item_id)?;
            if name.is_none() {
                name = item.get("name").and_then(Value::as_str).map(String::from);
            }
            if assignee.is_none() && !remove_assignee {
                assignee = item
                    .get("assignee")
                    .and_then(|assignee| assignee.get("id"))
                    .and_then(Value::as_i64);
            }
        }

        let mut payload = Map::new();
        insert_opt(&mut payload, "name", name.as_deref());
        if remove_assignee {
            payload.insert("assignee".to_string(), Value::Null);
        } else if let Some(assignee) = assignee {
            payload.insert("assignee".to_string(), json!(assignee));
        }
        payload.insert("resolved".to_string(), json!(bool_query(request.resolved)));
        insert_opt(&mut payload, "parent", request.parent.as_deref());

        self.request_json(
            Method::PUT,
            &format!(
                "checklist/{}/checklist_item/{}",
                checklist_id, checklist_item_id,
            ),
            &[],
            Some(Value::Object(payload)),
        )
        .await
    }

    /// タスクにコメントを作成する。
    pub async fn create_task_comment(
        &self,
        task_id: &str,
        request: &CommentRequest,
        custom_task_ids: bool,
        team_id: Option<i64>,
    ) -> Result<Value> {
        let mut query = vec![(
            "custom_task_ids".to_string(),
            custom_ids_query(custom_task_ids, team_id),
        )];
        if let Some(team_id) = team_id {
            query.push(("team_id".to_string(), team_id.to_string()));
        }

        self.request_json(
            Method::POST,
            &format!("task/{}/comment", task_id),
            &query,
            Some(comment_payload(request)),
        )
        .await
    }

    /// listにコメントを作成する。
    pub async fn create_list_comment(
        &self,
        list_id: i64,
        request: &CommentRequest,
    ) -> Result<Value> {
        self.request_json(
            Method::POST,
            &format!("list/{}/comment", list_id),
            &[],
            Some(comment_payload(request)),
        )
        .await
    }

    /// chat viewにコメントを作成する。
    pub async fn create_chat_view_comment(
        &self,
        view_id: &str,
        request: &CommentRequest,
    ) -> Result<Value> {
        self.request_json(
            Method::POST,
            &format!("view/{}/comment", view_id),
            &[],
            Some(comment_payload(request)),
        )
        .await
    }

    /// コメントの内容を更新する。
    pub async fn update_comment(
        &self,
        comment_id: i64,
        comment_text: &str,
        assignee: Option<i64>,
        resolved: bool,
    ) -> Result<Value> {
        let mut payload = Map::new();
        payload.insert("comment_text".to_string(), json!(comment_text));
        if let Some(assignee) = assignee {
            payload.insert("assignee".to_string(), json!(assignee));
        }
        payload.insert("resolved".to_string(), json!(bool_query(resolved)));

        self.request_json(
            Method::PUT,
            &format!("comment/{}", comment_id),
            &[],
            Some(Value::Object(payload)),
        )
        .await
    }

    /// 2つのタスクをリンクする。
    pub async fn add_task_link(
        &self,
        task_id: &str,
        links_to: &str,
        custom_task_ids: bool,
        team_id: Option<i64>,
    ) -> Result<Value> {
        let mut query = vec![(
            "custom_task_ids".to_string(),
            custom_ids_query(custom_task_ids, team_id),
        )];
        if let Some(team_id) = team_id {
            query.push(("team_id".to_string(), team_id.to_string()));
        }

        self.request_json(
            Method::POST,
            &format!("task/{}/link/{}", task_id, links_to),
            &query,
            None,
        )
        .await
    }

    /// タスクに依存関係を設定する。
    ///
    /// `depends_on`と`dependency_of`はどちらか一方のみ指定できる。
    pub async fn add_task_dependency(
        &self,
        task_id: &str,
        depends_on: Option<&str>,
        dependency_of: Option<&str>,
        custom_task_ids: bool,
        team_id: Option<i64>,
    ) -> Result<Value> {
        let payload = dependency_payload(depends_on, dependency_of)?;

        let mut query = vec![(
            "custom_task_ids".to_string(),
            custom_ids_query(custom_task_ids, team_id),
        )];
        if let Some(team_id) = team_id {
            query.push(("team_id".to_string(), team_id.to_string()));
        }

        self.request_json(
            Method::POST,
            &format!("task/{}/dependency", task_id),
            &query,
            Some(payload),
        )
        .await
    }

    /// タスクを削除する。
    pub async fn delete_task(
        &self,
        task_id: &str,
        custom_task_ids: bool,
        team_id: Option<i64>,
    ) -> Result<StatusCode> {
        let path = with_custom_ids_path(
            &format!("task/{}", task_id),
            custom_task_ids,
            team_id,
        );

        self.request_status(Method::DELETE, &path).await
    }

    /// タスクを追加先のlistから取り除く。
    pub async fn remove_task_from_list(&self, list_id: i64, task_id: &str) -> Result<StatusCode> {
        self.request_status(
            Method::DELETE,
            &format!("list/{}/task/{}", list_id, task_id),
        )
        .await
    }

    /// コメントを削除する。
    pub async fn delete_comment(&self, comment_id: i64) -> Result<StatusCode> {
        self.request_status(Method::DELETE, &format!("comment/{}", comment_id))
            .await
    }

    /// checklistを削除する。
    pub async fn delete_checklist(&self, checklist_id: &str) -> Result<StatusCode> {
        self.request_status(Method::DELETE, &format!("checklist/{}", checklist_id))
            .await
    }

    /// checklist itemを削除する。
    pub async fn delete_checklist_item(
        &self,
        checklist_id: &str,
        checklist_item_id: &str,
    ) -> Result<StatusCode> {
        self.request_status(
            Method::DELETE,
            &format!(
                "checklist/{}/checklist_item/{}",
                checklist_id, checklist_item_id,
            ),
        )
        .await
    }

    /// タスク間のリンクを削除する。
    pub async fn delete_task_link(
        &self,
        task_id: &str,
        links_to: &str,
        custom_task_ids: bool,
        team_id: Option<i64>,
    ) -> Result<StatusCode> {
        let path = with_custom_ids_path(
            &format!("task/{}/link/{}", task_id, links_to),
            custom_task_ids,
            team_id,
        );

        self.request_status(Method::DELETE, &path).await
    }

    /// タスクの依存関係を削除する。
    pub async fn delete_dependency(
        &self,
        task_id: &str,
        depends_on: Option<&str>,
        dependency_of: Option<&str>,
        custom_task_ids: bool,
        team_id: Option<i64>,
    ) -> Result<StatusCode> {
        let target = dependency_payload(depends_on, dependency_of)?;
        let (key, value) = target
            .as_object()
            .and_then(|map| map.iter().next())
            .map(|(key, value)| (key.clone(), value.clone()))
            .ok_or_else(|| Error::Payload("dependency target is missing".to_string()))?;
        let value = value
            .as_str()
            .ok_or_else(|| Error::Payload("dependency target is not a string".to_string()))?
            .to_string();

        let mut path = format!("task/{}/dependency?{}={}", task_id, key, value);
        path.push_str(&format!(
            "&custom_task_ids={}",
            custom_ids_query(custom_task_ids, team_id),
        ));
        if let Some(team_id) = team_id {
            path.push_str(&format!("&team_id={}", team_id));
        }

        self.request_status(Method::DELETE, &path).await
    }
}

/// workspace一覧とtime entriesの取得を抽象化するtrait。
///
/// 集計処理はこのtraitを介してAPIへアクセスする。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickUpRepository {
    /// トークンで認可されたworkspace一覧を取得する。
    async fn authorized_workspaces(&self) -> Result<WorkspacesResponse>;

    /// workspace内のtime entries一覧を取得する。
    async fn time_entries(&self, team_id: i64, query: &TimeEntriesQuery) -> Result<Value>;
}

#[async_trait]
impl ClickUpRepository for ClickUpClient {
    async fn authorized_workspaces(&self) -> Result<WorkspacesResponse> {
        self.get_authorized_workspaces().await
    }

    async fn time_entries(&self, team_id: i64, query: &TimeEntriesQuery) -> Result<Value> {
        self.get_time_entries(team_id, query).await
    }
}

/// `custom_task_ids`クエリの値を決める。`team_id`の指定は暗黙にtrueとして扱う。
fn custom_ids_query(custom_task_ids: bool, team_id: Option<i64>) -> String {
    bool_query(custom_task_ids || team_id.is_some()).to_string()
}

/// DELETEリクエスト用にクエリ付きのパスを組み立てる。
fn with_custom_ids_path(path: &str, custom_task_ids: bool, team_id: Option<i64>) -> String {
    let mut path = format!(
        "{}?custom_task_ids={}",
        path,
        custom_ids_query(custom_task_ids, team_id),
    );
    if let Some(team_id) = team_id {
        path.push_str(&format!("&team_id={}", team_id));
    }
    path
}

/// 日付フィルタをミリ秒のクエリパラメータとして追加する。
fn push_date(
    params: &mut Vec<(String, String)>,
    key: &str,
    date: &Option<DateSpec>,
) -> Result<()> {
    if let Some(date) = date {
        params.push((key.to_string(), date.to_unix_millis()?.to_string()));
    }
    Ok(())
}

/// コメント一覧のページングパラメータを追加する。
fn push_comment_paging(
    params: &mut Vec<(String, String)>,
    start: Option<&DateSpec>,
    start_id: Option<&str>,
) -> Result<()> {
    if let Some(start) = start {
        params.push(("start".to_string(), start.to_unix_millis()?.to_string()));
    }
    if let Some(start_id) = start_id {
        params.push(("start_id".to_string(), start_id.to_string()));
    }
    Ok(())
}

/// `Some`の場合のみ文字列フィールドをペイロードへ追加する。
fn insert_opt(payload: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        payload.insert(key.to_string(), json!(value));
    }
}

/// コメント作成リクエストのペイロードを組み立てる。
fn comment_payload(request: &CommentRequest) -> Value {
    let mut payload = Map::new();
    payload.insert("comment_text".to_string(), json!(request.comment_text));
    if let Some(assignee) = request.assignee {
        payload.insert("assignee".to_string(), json!(assignee));
    }
    payload.insert(
        "notify_all".to_string(),
        json!(bool_query(request.notify_all)),
    );
    Value::Object(payload)
}

/// 依存関係リクエストのペイロードを組み立てる。
fn dependency_payload(depends_on: Option<&str>, dependency_of: Option<&str>) -> Result<Value> {
    match (depends_on, dependency_of) {
        (Some(depends_on), None) => Ok(json!({"depends_on": depends_on})),
        (None, Some(dependency_of)) => Ok(json!({"dependency_of": dependency_of})),
        _ => Err(Error::InvalidValue(
            "Either 'depends_on' or 'dependency_of' has to be specified, \
             but not both."
                .to_string(),
        )),
    }
}

/// タスクのレスポンスからchecklist itemを探す。
fn find_checklist_item<'a>(
    task: &'a Value,
    checklist_id: &str,
    checklist_item_id: &str,
) -> Result<&'a Value> {
    let checklists = task
        .get("checklists")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Payload("task response has no 'checklists' field".to_string()))?;
    let checklist = checklists
        .iter()
        .find(|checklist| checklist.get("id").and_then(Value::as_str) == Some(checklist_id))
        .ok_or_else(|| {
            Error::Payload(format!("checklist '{}' not found on task", checklist_id))
        })?;
    let items = checklist
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Payload("checklist response has no 'items' field".to_string()))?;

    items
        .iter()
        .find(|item| item.get("id").and_then(Value::as_str) == Some(checklist_item_id))
        .ok_or_else(|| {
            Error::Payload(format!(
                "checklist item '{}' not found in checklist '{}'",
                checklist_item_id, checklist_id,
            ))
        })
}

/// 当月1日の0時(UTC)をミリ秒で返す。
fn first_day_of_current_month_millis() -> Result<i64> {
    use chrono::Datelike;

    let now = datetime::now();
    DateSpec::from(vec![i64::from(now.year()), i64::from(now.month()), 1]).to_unix_millis()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use mockito::Matcher;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::datetime::mock_datetime;
    use crate::filters::MockFillerSource;

    /// 固定値を返すモックの生成元を作成する。
    fn fixed_filler() -> MockFillerSource {
        let mut filler = MockFillerSource::new();
        filler
            .expect_string_filler()
            .returning(|| "abcd1234".to_string());
        filler.expect_numeric_filler().returning(|| 12_345_678);
        filler
    }

    /// モックサーバーへ接続するクライアントを作成する。
    fn test_client(server: &mockito::ServerGuard) -> ClickUpClient {
        ClickUpClient::new("pk_test_token", Some(&server.url()))
            .unwrap()
            .with_filler(Box::new(fixed_filler()))
    }

    /// URL末尾のスラッシュが正規化されることを確認する。
    #[rstest]
    #[case::with_slash("https://example.com/api/v2/")]
    #[case::without_slash("https://example.com/api/v2")]
    fn test_new_normalizes_url(#[case] url: &str) {
        let client = ClickUpClient::new("pk_test_token", Some(url)).unwrap();

        assert_eq!(client.api_url(), "https://example.com/api/v2/");
    }

    #[test]
    fn test_new_uses_default_url() {
        let client = ClickUpClient::new("pk_test_token", None).unwrap();

        assert_eq!(client.api_url(), API_DEFAULT_URL);
    }

    /// 空のトークンと不正なURLはエラーになることを確認する。
    #[rstest]
    #[case::empty_token("", Some("https://example.com"))]
    #[case::invalid_url("pk_test_token", Some("not a url"))]
    fn test_new_invalid_arguments(#[case] token: &str, #[case] api_url: Option<&str>) {
        let result = ClickUpClient::new(token, api_url);

        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }

    /// workspace一覧がデシリアライズされることを確認する。
    #[tokio::test]
    async fn test_get_authorized_workspaces() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/team/")
            .match_header("authorization", "pk_test_token")
            .with_status(200)
            .with_body(
                json!({
                    "teams": [{
                        "id": "123",
                        "name": "workspace one",
                        "members": [{"user": {"id": 1, "username": "alice"}}],
                    }],
                })
                .to_string(),
            )
            .create_async()
            .await;
        let client = test_client(&server);

        let workspaces = client.get_authorized_workspaces().await.unwrap();

        mock.assert_async().await;
        assert_eq!(workspaces.teams.len(), 1);
        assert_eq!(workspaces.teams[0].id, 123);
        assert_eq!(workspaces.teams[0].members[0].user.username, "alice");
    }

    /// 想定外の構造のレスポンスはDecodeエラーになることを確認する。
    #[tokio::test]
    async fn test_get_authorized_workspaces_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/team/")
            .with_status(401)
            .with_body(json!({"err": "Token invalid"}).to_string())
            .create_async()
            .await;
        let client = test_client(&server);

        let result = client.get_authorized_workspaces().await;

        assert!(matches!(result, Err(Error::Decode(_))));
    }

    /// 不正なorder_byはリクエストを送らずエラーになることを確認する。
    #[tokio::test]
    async fn test_get_tasks_rejects_invalid_order_by() {
        let client = ClickUpClient::new("pk_test_token", None).unwrap();
        let query = TasksQuery {
            order_by: "name".to_string(),
            ..Default::default()
        };

        let result = client.get_tasks(1, &query).await;

        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }

    /// custom_fieldsフィルタは未実装エラーになることを確認する。
    #[tokio::test]
    async fn test_get_tasks_rejects_custom_fields() {
        let client = ClickUpClient::new("pk_test_token", None).unwrap();
        let query = TasksQuery {
            custom_fields: vec!["field".to_string()],
            ..Default::default()
        };

        let result = client.get_tasks(1, &query).await;

        assert!(matches!(result, Err(Error::CustomFieldsUnsupported)));
    }

    /// ステータス集合に無いステータスのフィルタはエラーになることを確認する。
    #[tokio::test]
    async fn test_get_tasks_validates_statuses() {
        let client = ClickUpClient::new("pk_test_token", None)
            .unwrap()
            .with_status_set(StatusSet::new(["open", "done"]));
        let query = TasksQuery {
            statuses: vec!["unknown".to_string()],
            ..Default::default()
        };

        let result = client.get_tasks(1, &query).await;

        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }

    /// 1要素のフィルタが穴埋めされ、日付がミリ秒へ変換されることを確認する。
    #[tokio::test]
    async fn test_get_tasks_query_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/list/1/task")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("archived".into(), "false".into()),
                Matcher::UrlEncoded("order_by".into(), "created".into()),
                Matcher::UrlEncoded("statuses".into(), "open".into()),
                Matcher::UrlEncoded("statuses".into(), "abcd1234".into()),
                Matcher::UrlEncoded("due_date_lt".into(), "1728518400000".into()),
                Matcher::UrlEncoded("subtasks".into(), "true".into()),
            ]))
            .with_status(200)
            .with_body(json!({"tasks": []}).to_string())
            .create_async()
            .await;
        let client = test_client(&server);
        let query = TasksQuery {
            statuses: vec!["open".to_string()],
            due_date_lt: Some(DateSpec::from(vec![2024, 10, 10])),
            subtasks: true,
            ..Default::default()
        };

        client.get_tasks(1, &query).await.unwrap();

        mock.assert_async().await;
    }

    /// subtasksがfalseの場合はクエリに含まれないことを確認する。
    #[tokio::test]
    async fn test_get_tasks_omits_subtasks_when_false() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/list/1/task")
            .match_query(Matcher::Exact(
                "archived=false&include_markdown_description=false&page=0\
                 &order_by=created&reverse=false&include_closed=false"
                    .to_string(),
            ))
            .with_status(200)
            .with_body(json!({"tasks": []}).to_string())
            .create_async()
            .await;
        let client = test_client(&server);

        client.get_tasks(1, &TasksQuery::default()).await.unwrap();

        mock.assert_async().await;
    }

    /// 指定した日付範囲とassigneeがクエリに反映されることを確認する。
    #[tokio::test]
    async fn test_get_time_entries_query_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/team/123/time_entries")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start_date".into(), "1714521600000".into()),
                Matcher::UrlEncoded("end_date".into(), "1717200000000".into()),
                Matcher::UrlEncoded("assignee".into(), "1,2".into()),
                Matcher::UrlEncoded("custom_task_ids".into(), "false".into()),
            ]))
            .with_status(200)
            .with_body(json!({"data": []}).to_string())
            .create_async()
            .await;
        let client = test_client(&server);
        let query = TimeEntriesQuery {
            start_date: Some(DateSpec::from(vec![2024, 5, 1])),
            end_date: Some(DateSpec::from(vec![2024, 6, 1])),
            assignees: vec![1, 2],
            ..Default::default()
        };

        client.get_time_entries(123, &query).await.unwrap();

        mock.assert_async().await;
    }

    /// 日付を省略した場合は当月1日から現在時刻までになることを確認する。
    #[tokio::test]
    async fn test_get_time_entries_default_dates() {
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap();
        mock_datetime::set_mock_time(now);

        let start = Utc
            .with_ymd_and_hms(2024, 5, 1, 0, 0, 0)
            .unwrap()
            .timestamp_millis();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/team/123/time_entries")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start_date".into(), start.to_string()),
                Matcher::UrlEncoded("end_date".into(), now.timestamp_millis().to_string()),
            ]))
            .with_status(200)
            .with_body(json!({"data": []}).to_string())
            .create_async()
            .await;
        let client = test_client(&server);

        client
            .get_time_entries(123, &TimeEntriesQuery::default())
            .await
            .unwrap();

        mock.assert_async().await;
        mock_datetime::clear_mock_time();
    }

    /// team_id指定時にcustom_task_idsが暗黙にtrueになることを確認する。
    #[tokio::test]
    async fn test_get_time_entries_team_id_forces_custom_ids() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/team/123/time_entries")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("custom_task_ids".into(), "true".into()),
                Matcher::UrlEncoded("team_id".into(), "456".into()),
            ]))
            .with_status(200)
            .with_body(json!({"data": []}).to_string())
            .create_async()
            .await;
        let client = test_client(&server);
        let query = TimeEntriesQuery {
            start_date: Some(DateSpec::from(vec![2024, 5, 1])),
            end_date: Some(DateSpec::from(vec![2024, 6, 1])),
            query_team_id: Some(456),
            ..Default::default()
        };

        client.get_time_entries(123, &query).await.unwrap();

        mock.assert_async().await;
    }

    /// 作成ペイロードに日付とboolリテラルが反映されることを確認する。
    #[tokio::test]
    async fn test_create_task_payload() {
        let due_date = DateSpec::from(vec![2024, 10, 10]).to_unix_millis().unwrap();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/list/1/task")
            .match_query(Matcher::UrlEncoded(
                "custom_task_ids".into(),
                "false".into(),
            ))
            .match_body(Matcher::PartialJson(json!({
                "name": "new task",
                "due_date": due_date,
                "due_date_time": "false",
                "notify_all": "true",
                "time_estimate": 3_600_000,
            })))
            .with_status(200)
            .with_body(json!({"id": "task1"}).to_string())
            .create_async()
            .await;
        let client = test_client(&server);
        let request = CreateTaskRequest {
            name: "new task".to_string(),
            due_date: Some(DateSpec::from(vec![2024, 10, 10])),
            notify_all: true,
            time_estimate: Some(vec![0, 1, 0]),
            ..Default::default()
        };

        client.create_task(1, &request).await.unwrap();

        mock.assert_async().await;
    }

    /// 不正なtime estimateはリクエストを送らずエラーになることを確認する。
    #[tokio::test]
    async fn test_create_task_invalid_time_estimate() {
        let client = ClickUpClient::new("pk_test_token", None).unwrap();
        let request = CreateTaskRequest {
            name: "new task".to_string(),
            time_estimate: Some(vec![1, 0]),
            ..Default::default()
        };

        let result = client.create_task(1, &request).await;

        assert!(matches!(result, Err(Error::TimeEstimate)));
    }

    /// assigneeの追加・削除がaddとremのリストに分かれることを確認する。
    #[tokio::test]
    async fn test_update_task_assignees() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/task/abc123")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({
                "assignees": {"add": [1, 2], "rem": [3]},
                "archived": "false",
            })))
            .with_status(200)
            .with_body(json!({"id": "abc123"}).to_string())
            .create_async()
            .await;
        let client = test_client(&server);
        let request = UpdateTaskRequest {
            assignees_to_add: vec![1, 2],
            assignees_to_remove: vec![3],
            ..Default::default()
        };

        client.update_task("abc123", &request).await.unwrap();

        mock.assert_async().await;
    }

    /// nameとassigneeの省略時にタスクの現在値が補完されることを確認する。
    #[tokio::test]
    async fn test_edit_checklist_item_backfills_current_values() {
        let mut server = mockito::Server::new_async().await;
        let task_mock = server
            .mock("GET", "/task/abc123")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({
                    "id": "abc123",
                    "checklists": [{
                        "id": "cl1",
                        "items": [{
                            "id": "item1",
                            "name": "current name",
                            "assignee": {"id": 7},
                        }],
                    }],
                })
                .to_string(),
            )
            .create_async()
            .await;
        let edit_mock = server
            .mock("PUT", "/checklist/cl1/checklist_item/item1")
            .match_body(Matcher::PartialJson(json!({
                "name": "current name",
                "assignee": 7,
                "resolved": "true",
            })))
            .with_status(200)
            .with_body(json!({"checklist": {"id": "cl1"}}).to_string())
            .create_async()
            .await;
        let client = test_client(&server);
        let request = EditChecklistItemRequest {
            task_id: "abc123".to_string(),
            resolved: true,
            ..Default::default()
        };

        client
            .edit_checklist_item("cl1", "item1", &request)
            .await
            .unwrap();

        task_mock.assert_async().await;
        edit_mock.assert_async().await;
    }

    /// remove_assignee指定時はassigneeがnullで送信されることを確認する。
    #[tokio::test]
    async fn test_edit_checklist_item_removes_assignee() {
        let mut server = mockito::Server::new_async().await;
        let _task_mock = server
            .mock("GET", "/task/abc123")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({
                    "id": "abc123",
                    "checklists": [{
                        "id": "cl1",
                        "items": [{"id": "item1", "name": "current name"}],
                    }],
                })
                .to_string(),
            )
            .create_async()
            .await;
        let edit_mock = server
            .mock("PUT", "/checklist/cl1/checklist_item/item1")
            .match_body(Matcher::PartialJson(json!({
                "name": "current name",
                "assignee": null,
            })))
            .with_status(200)
            .with_body(json!({"checklist": {"id": "cl1"}}).to_string())
            .create_async()
            .await;
        let client = test_client(&server);
        let request = EditChecklistItemRequest {
            task_id: "abc123".to_string(),
            remove_assignee: true,
            ..Default::default()
        };

        client
            .edit_checklist_item("cl1", "item1", &request)
            .await
            .unwrap();

        edit_mock.assert_async().await;
    }

    /// depends_onとdependency_ofの同時指定はエラーになることを確認する。
    #[rstest]
    #[case::both(Some("task1"), Some("task2"))]
    #[case::neither(None, None)]
    #[tokio::test]
    async fn test_add_task_dependency_invalid_target(
        #[case] depends_on: Option<&str>,
        #[case] dependency_of: Option<&str>,
    ) {
        let client = ClickUpClient::new("pk_test_token", None).unwrap();

        let result = client
            .add_task_dependency("abc123", depends_on, dependency_of, false, None)
            .await;

        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }

    /// DELETEはレスポンスのステータスコードを返すことを確認する。
    #[tokio::test]
    async fn test_delete_task_returns_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/task/abc123")
            .match_query(Matcher::UrlEncoded(
                "custom_task_ids".into(),
                "false".into(),
            ))
            .with_status(204)
            .create_async()
            .await;
        let client = test_client(&server);

        let status = client.delete_task("abc123", false, None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    /// 依存関係の削除対象がクエリに反映されることを確認する。
    #[tokio::test]
    async fn test_delete_dependency_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/task/abc123/dependency")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("depends_on".into(), "task2".into()),
                Matcher::UrlEncoded("custom_task_ids".into(), "false".into()),
            ]))
            .with_status(200)
            .create_async()
            .await;
        let client = test_client(&server);

        let status = client
            .delete_dependency("abc123", Some("task2"), None, false, None)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
    }
}
