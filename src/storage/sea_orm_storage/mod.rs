//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod courses;
mod grades;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListItem,
    },
    courses::{
        entities::Course,
        requests::{CreateCourseRequest, UpdateCourseRequest},
        responses::{CourseListItem, CourseStudent},
    },
    files::entities::{Attachment, SubmissionFile},
    grades::{
        entities::Grade,
        requests::{GradeSubmissionRequest, UpdateGradeRequest},
        responses::GradeDetail,
    },
    submissions::{
        entities::Submission, requests::NewSubmissionFile, responses::SubmissionDetail,
    },
    users::{
        entities::{User, UserStatus},
        requests::CreateUserData,
        responses::StudentSummary,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, data: CreateUserData) -> Result<User> {
        self.create_user_impl(data).await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_pending_users(&self) -> Result<Vec<User>> {
        self.list_pending_users_impl().await
    }

    async fn list_students(&self) -> Result<Vec<StudentSummary>> {
        self.list_students_impl().await
    }

    async fn update_user_status(&self, id: &str, status: UserStatus) -> Result<Option<User>> {
        self.update_user_status_impl(id, status).await
    }

    async fn update_user_profile(
        &self,
        id: &str,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>> {
        self.update_user_profile_impl(id, full_name, email).await
    }

    async fn update_user_password(&self, id: &str, password_hash: &str) -> Result<bool> {
        self.update_user_password_impl(id, password_hash).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 课程模块
    async fn create_course(&self, professor_id: &str, req: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(professor_id, req).await
    }

    async fn get_course_by_id(&self, id: &str) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses(&self) -> Result<Vec<CourseListItem>> {
        self.list_courses_impl().await
    }

    async fn update_course(&self, id: &str, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: &str) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    async fn enroll_student(&self, course_id: &str, student_id: &str) -> Result<()> {
        self.enroll_student_impl(course_id, student_id).await
    }

    async fn remove_student(&self, course_id: &str, student_id: &str) -> Result<bool> {
        self.remove_student_impl(course_id, student_id).await
    }

    async fn list_course_students(&self, course_id: &str) -> Result<Vec<CourseStudent>> {
        self.list_course_students_impl(course_id).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        professor_id: &str,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(professor_id, req).await
    }

    async fn get_assignment_by_id(&self, id: &str) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments(&self) -> Result<Vec<AssignmentListItem>> {
        self.list_assignments_impl().await
    }

    async fn update_assignment(
        &self,
        id: &str,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: &str) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    async fn assignment_has_grades(&self, assignment_id: &str) -> Result<bool> {
        self.assignment_has_grades_impl(assignment_id).await
    }

    async fn add_attachment(
        &self,
        assignment_id: &str,
        file_name: &str,
        file_path: &str,
        file_size: i64,
        mime_type: &str,
    ) -> Result<Attachment> {
        self.add_attachment_impl(assignment_id, file_name, file_path, file_size, mime_type)
            .await
    }

    async fn get_attachment_by_id(&self, id: &str) -> Result<Option<Attachment>> {
        self.get_attachment_by_id_impl(id).await
    }

    async fn list_attachments(&self, assignment_id: &str) -> Result<Vec<Attachment>> {
        self.list_attachments_impl(assignment_id).await
    }

    async fn delete_attachment(&self, id: &str) -> Result<bool> {
        self.delete_attachment_impl(id).await
    }

    // 提交模块
    async fn upsert_submission(
        &self,
        assignment_id: &str,
        student_id: &str,
        content: Option<String>,
    ) -> Result<Submission> {
        self.upsert_submission_impl(assignment_id, student_id, content)
            .await
    }

    async fn get_submission_by_id(&self, id: &str) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_by_pair(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_pair_impl(assignment_id, student_id)
            .await
    }

    async fn get_submission_detail(&self, id: &str) -> Result<Option<SubmissionDetail>> {
        self.get_submission_detail_impl(id).await
    }

    async fn list_submissions_by_student(&self, student_id: &str) -> Result<Vec<SubmissionDetail>> {
        self.list_submissions_by_student_impl(student_id).await
    }

    async fn list_submissions_for_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<SubmissionDetail>> {
        self.list_submissions_for_assignment_impl(assignment_id)
            .await
    }

    async fn submit_with_files(
        &self,
        submission_id: &str,
        assignment_id: &str,
        student_id: &str,
        content: Option<String>,
        files: &[NewSubmissionFile],
    ) -> Result<Submission> {
        self.submit_with_files_impl(submission_id, assignment_id, student_id, content, files)
            .await
    }

    async fn get_submission_file_by_id(&self, id: &str) -> Result<Option<SubmissionFile>> {
        self.get_submission_file_by_id_impl(id).await
    }

    async fn delete_submission_file(&self, id: &str) -> Result<bool> {
        self.delete_submission_file_impl(id).await
    }

    // 评分模块
    async fn upsert_grade(
        &self,
        grader_id: &str,
        submission_id: &str,
        req: GradeSubmissionRequest,
    ) -> Result<Grade> {
        self.upsert_grade_impl(grader_id, submission_id, req).await
    }

    async fn get_grade_by_id(&self, id: &str) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(id).await
    }

    async fn update_grade(&self, id: &str, update: UpdateGradeRequest) -> Result<Option<Grade>> {
        self.update_grade_impl(id, update).await
    }

    async fn delete_grade(&self, id: &str) -> Result<bool> {
        self.delete_grade_impl(id).await
    }

    async fn list_grades_by_student(&self, student_id: &str) -> Result<Vec<GradeDetail>> {
        self.list_grades_by_student_impl(student_id).await
    }

    async fn list_grades_for_assignment(&self, assignment_id: &str) -> Result<Vec<GradeDetail>> {
        self.list_grades_for_assignment_impl(assignment_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::grades::requests::GradeSubmissionRequest;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::models::users::entities::{UserRole, UserStatus};
    use crate::models::users::requests::CreateUserData;

    /// 每个测试用独立的临时 SQLite 数据库
    async fn test_storage() -> SeaOrmStorage {
        let path = std::env::temp_dir().join(format!("lms-test-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let db = Database::connect(&url).await.expect("connect sqlite");
        Migrator::up(&db, None).await.expect("run migrations");
        SeaOrmStorage { db }
    }

    fn user_data(email: &str, role: UserRole) -> CreateUserData {
        CreateUserData {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            full_name: "테스트사용자".to_string(),
            role,
            status: UserStatus::Approved,
        }
    }

    async fn seed_submission(storage: &SeaOrmStorage) -> (String, String, String) {
        let professor = storage
            .create_user_impl(user_data("prof@office.kopo.ac.kr", UserRole::Professor))
            .await
            .expect("create professor");
        let student = storage
            .create_user_impl(user_data("stud@office.kopo.ac.kr", UserRole::Student))
            .await
            .expect("create student");
        let assignment = storage
            .create_assignment_impl(
                &professor.id,
                CreateAssignmentRequest {
                    title: "과제 1".to_string(),
                    description: None,
                    due_date: chrono::Utc::now() + chrono::Duration::days(7),
                    max_score: Some(100),
                    course_id: None,
                },
            )
            .await
            .expect("create assignment");

        let submission = storage
            .upsert_submission_impl(&assignment.id, &student.id, Some("첫 제출".to_string()))
            .await
            .expect("submit");
        assert_eq!(submission.status, SubmissionStatus::Pending);

        (professor.id, assignment.id, submission.id)
    }

    #[tokio::test]
    async fn test_submission_upsert_keeps_same_row() {
        let storage = test_storage().await;
        let (_, assignment_id, submission_id) = seed_submission(&storage).await;

        let student_id = storage
            .get_submission_by_id_impl(&submission_id)
            .await
            .expect("query")
            .expect("exists")
            .student_id;

        let resubmitted = storage
            .upsert_submission_impl(&assignment_id, &student_id, Some("수정본".to_string()))
            .await
            .expect("resubmit");

        assert_eq!(resubmitted.id, submission_id);
        assert_eq!(resubmitted.content.as_deref(), Some("수정본"));
    }

    #[tokio::test]
    async fn test_resubmit_keeps_graded_status() {
        let storage = test_storage().await;
        let (professor_id, assignment_id, submission_id) = seed_submission(&storage).await;

        let student_id = storage
            .get_submission_by_id_impl(&submission_id)
            .await
            .expect("query")
            .expect("exists")
            .student_id;

        storage
            .upsert_grade_impl(
                &professor_id,
                &submission_id,
                GradeSubmissionRequest {
                    score: 90,
                    feedback: None,
                },
            )
            .await
            .expect("grade");

        // 评分后重新提交：内容更新，但状态和评分记录不受影响
        let resubmitted = storage
            .upsert_submission_impl(&assignment_id, &student_id, Some("수정본".to_string()))
            .await
            .expect("resubmit");
        assert_eq!(resubmitted.id, submission_id);
        assert_eq!(resubmitted.status, SubmissionStatus::Graded);

        let grades = storage
            .list_grades_by_student_impl(&student_id)
            .await
            .expect("list grades");
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].grade.score, 90);
    }

    #[tokio::test]
    async fn test_submit_with_files_records_rows_atomically() {
        let storage = test_storage().await;
        let (_, assignment_id, submission_id) = seed_submission(&storage).await;

        let student_id = storage
            .get_submission_by_id_impl(&submission_id)
            .await
            .expect("query")
            .expect("exists")
            .student_id;

        let files = vec![
            NewSubmissionFile {
                file_name: "report.pdf".to_string(),
                file_path: format!("{submission_id}/abc_report.pdf"),
                file_size: 1024,
                mime_type: "application/pdf".to_string(),
            },
            NewSubmissionFile {
                file_name: "code.zip".to_string(),
                file_path: format!("{submission_id}/def_code.zip"),
                file_size: 2048,
                mime_type: "application/zip".to_string(),
            },
        ];

        let submission = storage
            .submit_with_files_impl(
                &submission_id,
                &assignment_id,
                &student_id,
                Some("첨부 포함".to_string()),
                &files,
            )
            .await
            .expect("submit with files");
        assert_eq!(submission.id, submission_id);

        let detail = storage
            .get_submission_detail_impl(&submission_id)
            .await
            .expect("query detail")
            .expect("exists");
        assert_eq!(detail.files.len(), 2);
        assert_eq!(detail.submission.content.as_deref(), Some("첨부 포함"));
    }

    #[tokio::test]
    async fn test_grade_lifecycle_flips_submission_status() {
        let storage = test_storage().await;
        let (professor_id, assignment_id, submission_id) = seed_submission(&storage).await;

        assert!(!storage
            .assignment_has_grades_impl(&assignment_id)
            .await
            .expect("has grades"));

        let grade = storage
            .upsert_grade_impl(
                &professor_id,
                &submission_id,
                GradeSubmissionRequest {
                    score: 88,
                    feedback: Some("잘했어요".to_string()),
                },
            )
            .await
            .expect("grade");
        assert_eq!(grade.score, 88);

        let graded = storage
            .get_submission_by_id_impl(&submission_id)
            .await
            .expect("query")
            .expect("exists");
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert!(storage
            .assignment_has_grades_impl(&assignment_id)
            .await
            .expect("has grades"));

        // 重新评分仍然只保留一条记录
        let regraded = storage
            .upsert_grade_impl(
                &professor_id,
                &submission_id,
                GradeSubmissionRequest {
                    score: 95,
                    feedback: None,
                },
            )
            .await
            .expect("regrade");
        assert_eq!(regraded.id, grade.id);
        assert_eq!(regraded.score, 95);

        // 撤销评分后提交回到待评分
        assert!(storage.delete_grade_impl(&grade.id).await.expect("delete"));
        let reverted = storage
            .get_submission_by_id_impl(&submission_id)
            .await
            .expect("query")
            .expect("exists");
        assert_eq!(reverted.status, SubmissionStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_students_returns_only_student_role() {
        let storage = test_storage().await;

        storage
            .create_user_impl(user_data("prof@office.kopo.ac.kr", UserRole::Professor))
            .await
            .expect("create professor");
        let student = storage
            .create_user_impl(user_data("stud@office.kopo.ac.kr", UserRole::Student))
            .await
            .expect("create student");

        let roster = storage.list_students_impl().await.expect("list students");
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, student.id);
        assert_eq!(roster[0].email, "stud@office.kopo.ac.kr");
    }

    #[tokio::test]
    async fn test_duplicate_email_and_enrollment_conflict() {
        let storage = test_storage().await;

        let professor = storage
            .create_user_impl(user_data("prof@office.kopo.ac.kr", UserRole::Professor))
            .await
            .expect("create professor");
        let student = storage
            .create_user_impl(user_data("stud@office.kopo.ac.kr", UserRole::Student))
            .await
            .expect("create student");

        let duplicate = storage
            .create_user_impl(user_data("stud@office.kopo.ac.kr", UserRole::Student))
            .await;
        assert!(duplicate.expect_err("duplicate email").is_conflict());

        let course = storage
            .create_course_impl(
                &professor.id,
                crate::models::courses::requests::CreateCourseRequest {
                    name: "자료구조".to_string(),
                },
            )
            .await
            .expect("create course");

        storage
            .enroll_student_impl(&course.id, &student.id)
            .await
            .expect("enroll");
        let again = storage.enroll_student_impl(&course.id, &student.id).await;
        assert!(again.expect_err("duplicate enrollment").is_conflict());
    }
}
