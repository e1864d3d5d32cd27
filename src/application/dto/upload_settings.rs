//! # Upload Settings DTO
//!
//! 動画メタデータの組み立て設定

use std::path::Path;

use crate::domain::entities::upload_request::{video_name, PrivacyStatus, UploadRequest};

/// Placeholder replaced by the file stem in `description_template`
pub const NAME_PLACEHOLDER: &str = "{name}";

/// アップロード設定
///
/// ファイルパスから `UploadRequest` を組み立てるためのメタデータ
#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// タイトルの接頭辞（後ろにファイル名が付く）
    pub title_prefix: String,
    /// 説明文のテンプレート（`{name}` をファイル名で置換）
    pub description_template: String,
    pub tags: Vec<String>,
    /// カテゴリID（例: "22" = People & Blogs）
    pub category_id: String,
    pub privacy_status: PrivacyStatus,
}

impl UploadSettings {
    /// 新しいアップロード設定を作成します。
    ///
    /// # 例
    ///
    /// ```
    /// use tubelift::application::dto::upload_settings::UploadSettings;
    /// use tubelift::domain::entities::upload_request::PrivacyStatus;
    ///
    /// let settings = UploadSettings::new(
    ///     "Viewer - ".to_string(),
    ///     "File: {name}".to_string(),
    ///     vec!["viewer".to_string()],
    ///     "22".to_string(),
    ///     PrivacyStatus::Unlisted,
    /// );
    ///
    /// let request = settings.build_request("videos/intro.mp4");
    /// assert_eq!(request.title(), "Viewer - intro");
    /// assert_eq!(request.description(), "File: intro");
    /// ```
    pub fn new(
        title_prefix: String,
        description_template: String,
        tags: Vec<String>,
        category_id: String,
        privacy_status: PrivacyStatus,
    ) -> Self {
        Self {
            title_prefix,
            description_template,
            tags,
            category_id,
            privacy_status,
        }
    }

    pub fn description_for(&self, name: &str) -> String {
        self.description_template.replace(NAME_PLACEHOLDER, name)
    }

    /// Build the immutable request for one file
    pub fn build_request(&self, file_path: impl AsRef<Path>) -> UploadRequest {
        let file_path = file_path.as_ref();
        let name = video_name(file_path);

        UploadRequest::new(
            file_path,
            format!("{}{}", self.title_prefix, name),
            self.description_for(&name),
            self.tags.clone(),
            self.category_id.clone(),
            self.privacy_status,
        )
    }
}
