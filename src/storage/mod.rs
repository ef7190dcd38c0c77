use std::sync::Arc;

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

use crate::errors::Result;

pub mod file_store;
pub mod sea_orm_storage;

pub use file_store::{FileStore, LocalFileStore, StoredFile};

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, data: CreateUserData) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出待审批用户
    async fn list_pending_users(&self) -> Result<Vec<User>>;
    // 列出全部学生名册
    async fn list_students(&self) -> Result<Vec<StudentSummary>>;
    // 更新用户审批状态
    async fn update_user_status(&self, id: &str, status: UserStatus) -> Result<Option<User>>;
    // 更新用户资料
    async fn update_user_profile(
        &self,
        id: &str,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>>;
    // 更新用户密码哈希
    async fn update_user_password(&self, id: &str, password_hash: &str) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 课程管理方法
    // 创建课程
    async fn create_course(&self, professor_id: &str, req: CreateCourseRequest) -> Result<Course>;
    // 通过ID获取课程
    async fn get_course_by_id(&self, id: &str) -> Result<Option<Course>>;
    // 列出课程（附教授姓名与选课人数）
    async fn list_courses(&self) -> Result<Vec<CourseListItem>>;
    // 更新课程
    async fn update_course(&self, id: &str, update: UpdateCourseRequest) -> Result<Option<Course>>;
    // 删除课程
    async fn delete_course(&self, id: &str) -> Result<bool>;
    // 选课
    async fn enroll_student(&self, course_id: &str, student_id: &str) -> Result<()>;
    // 退课
    async fn remove_student(&self, course_id: &str, student_id: &str) -> Result<bool>;
    // 列出课程学生
    async fn list_course_students(&self, course_id: &str) -> Result<Vec<CourseStudent>>;

    /// 作业管理方法
    // 创建作业
    async fn create_assignment(
        &self,
        professor_id: &str,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, id: &str) -> Result<Option<Assignment>>;
    // 列出作业（附教授姓名与附件数量）
    async fn list_assignments(&self) -> Result<Vec<AssignmentListItem>>;
    // 更新作业
    async fn update_assignment(
        &self,
        id: &str,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 删除作业
    async fn delete_assignment(&self, id: &str) -> Result<bool>;
    // 作业下是否已有评分（评分后锁定编辑/删除）
    async fn assignment_has_grades(&self, assignment_id: &str) -> Result<bool>;
    // 添加作业附件
    async fn add_attachment(
        &self,
        assignment_id: &str,
        file_name: &str,
        file_path: &str,
        file_size: i64,
        mime_type: &str,
    ) -> Result<Attachment>;
    // 通过ID获取附件
    async fn get_attachment_by_id(&self, id: &str) -> Result<Option<Attachment>>;
    // 列出作业附件
    async fn list_attachments(&self, assignment_id: &str) -> Result<Vec<Attachment>>;
    // 删除附件
    async fn delete_attachment(&self, id: &str) -> Result<bool>;

    /// 提交管理方法
    // 提交/重新提交作业（同一学生同一作业只保留一条记录）
    async fn upsert_submission(
        &self,
        assignment_id: &str,
        student_id: &str,
        content: Option<String>,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: &str) -> Result<Option<Submission>>;
    // 通过（作业，学生）获取提交
    async fn get_submission_by_pair(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> Result<Option<Submission>>;
    // 获取提交详情（含作业/学生/附件/评分）
    async fn get_submission_detail(&self, id: &str) -> Result<Option<SubmissionDetail>>;
    // 列出学生的所有提交（详情）
    async fn list_submissions_by_student(&self, student_id: &str) -> Result<Vec<SubmissionDetail>>;
    // 列出作业下的所有提交（详情）
    async fn list_submissions_for_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<SubmissionDetail>>;
    // 提交作业并登记附件记录（单事务；submission_id 为新记录备用 ID）
    async fn submit_with_files(
        &self,
        submission_id: &str,
        assignment_id: &str,
        student_id: &str,
        content: Option<String>,
        files: &[NewSubmissionFile],
    ) -> Result<Submission>;
    // 通过ID获取提交附件
    async fn get_submission_file_by_id(&self, id: &str) -> Result<Option<SubmissionFile>>;
    // 删除提交附件
    async fn delete_submission_file(&self, id: &str) -> Result<bool>;

    /// 评分管理方法
    // 评分/重新评分（同一提交只保留一条评分，事务内联动提交状态）
    async fn upsert_grade(
        &self,
        grader_id: &str,
        submission_id: &str,
        req: GradeSubmissionRequest,
    ) -> Result<Grade>;
    // 通过ID获取评分
    async fn get_grade_by_id(&self, id: &str) -> Result<Option<Grade>>;
    // 更新评分
    async fn update_grade(&self, id: &str, update: UpdateGradeRequest) -> Result<Option<Grade>>;
    // 删除评分（事务内将提交状态回退为待评分）
    async fn delete_grade(&self, id: &str) -> Result<bool>;
    // 列出学生的评分（学生视角）
    async fn list_grades_by_student(&self, student_id: &str) -> Result<Vec<GradeDetail>>;
    // 列出作业下的评分（教授视角）
    async fn list_grades_for_assignment(&self, assignment_id: &str) -> Result<Vec<GradeDetail>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
