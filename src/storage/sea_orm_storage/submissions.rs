//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::Entity as Assignments;
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::entity::submission_files::{
    ActiveModel as FileActiveModel, Column as FileColumn, Entity as SubmissionFiles,
};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::Entity as Users;
use crate::errors::{LmsError, Result};
use crate::models::{
    files::entities::SubmissionFile,
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::NewSubmissionFile,
        responses::{SubmissionAssignmentInfo, SubmissionDetail, SubmissionStudentInfo},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

impl SeaOrmStorage {
    /// 提交/重新提交作业
    ///
    /// 同一（作业，学生）只保留一条记录：已有记录则覆盖内容并刷新提交时间，
    /// 否则插入新记录。并发下的重复插入由唯一索引拦截并映射为冲突错误。
    pub async fn upsert_submission_impl(
        &self,
        assignment_id: &str,
        student_id: &str,
        content: Option<String>,
    ) -> Result<Submission> {
        Self::upsert_submission_on(&self.db, None, assignment_id, student_id, content).await
    }

    /// 提交作业并登记附件记录（单事务，避免出现只写了部分附件的提交）
    ///
    /// `submission_id` 是调用方预先确定的新记录 ID（附件已按它落盘）；
    /// 事务内若发现已有提交则沿用旧记录的 ID。
    pub async fn submit_with_files_impl(
        &self,
        submission_id: &str,
        assignment_id: &str,
        student_id: &str,
        content: Option<String>,
        files: &[NewSubmissionFile],
    ) -> Result<Submission> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let submission =
            Self::upsert_submission_on(&txn, Some(submission_id), assignment_id, student_id, content)
                .await?;

        let now = chrono::Utc::now().timestamp();
        for file in files {
            let model = FileActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                submission_id: Set(submission.id.clone()),
                file_name: Set(file.file_name.clone()),
                file_path: Set(file.file_path.clone()),
                file_size: Set(file.file_size),
                mime_type: Set(file.mime_type.clone()),
                uploaded_at: Set(now),
            };
            model
                .insert(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("创建提交附件记录失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(submission)
    }

    async fn upsert_submission_on<C: ConnectionTrait>(
        conn: &C,
        new_id: Option<&str>,
        assignment_id: &str,
        student_id: &str,
        content: Option<String>,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let existing = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(conn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        let result = match existing {
            Some(submission) => {
                // 重新提交只覆盖内容并刷新提交时间，已评分的状态保持不变
                let model = ActiveModel {
                    id: Set(submission.id.clone()),
                    content: Set(content),
                    submitted_at: Set(now),
                    ..Default::default()
                };
                model
                    .update(conn)
                    .await
                    .map_err(|e| LmsError::database_operation(format!("更新提交失败: {e}")))?
            }
            None => {
                let id = new_id
                    .map(str::to_string)
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let model = ActiveModel {
                    id: Set(id),
                    assignment_id: Set(assignment_id.to_string()),
                    student_id: Set(student_id.to_string()),
                    content: Set(content),
                    status: Set(SubmissionStatus::Pending.to_string()),
                    submitted_at: Set(now),
                };
                model.insert(conn).await.map_err(LmsError::from)?
            }
        };

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: &str) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 通过（作业，学生）获取提交
    pub async fn get_submission_by_pair_impl(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取提交详情
    pub async fn get_submission_detail_impl(&self, id: &str) -> Result<Option<SubmissionDetail>> {
        let Some(submission) = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let detail = self.assemble_submission_detail(submission).await?;
        Ok(Some(detail))
    }

    /// 列出学生的所有提交（详情）
    pub async fn list_submissions_by_student_impl(
        &self,
        student_id: &str,
    ) -> Result<Vec<SubmissionDetail>> {
        let submissions = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交列表失败: {e}")))?;

        let mut details = Vec::with_capacity(submissions.len());
        for submission in submissions {
            details.push(self.assemble_submission_detail(submission).await?);
        }
        Ok(details)
    }

    /// 列出作业下的所有提交（详情）
    pub async fn list_submissions_for_assignment_impl(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<SubmissionDetail>> {
        let submissions = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_desc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交列表失败: {e}")))?;

        let mut details = Vec::with_capacity(submissions.len());
        for submission in submissions {
            details.push(self.assemble_submission_detail(submission).await?);
        }
        Ok(details)
    }

    /// 拼装提交详情（作业、学生、附件、评分）
    async fn assemble_submission_detail(
        &self,
        submission: crate::entity::submissions::Model,
    ) -> Result<SubmissionDetail> {
        let assignment = Assignments::find_by_id(&submission.assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?
            .ok_or_else(|| {
                LmsError::not_found(format!("提交关联的作业不存在: {}", submission.assignment_id))
            })?;

        let student = Users::find_by_id(&submission.student_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学生失败: {e}")))?
            .ok_or_else(|| {
                LmsError::not_found(format!("提交关联的学生不存在: {}", submission.student_id))
            })?;

        let files = SubmissionFiles::find()
            .filter(FileColumn::SubmissionId.eq(&submission.id))
            .order_by_asc(FileColumn::UploadedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交附件失败: {e}")))?;

        let grade = Grades::find()
            .filter(GradeColumn::SubmissionId.eq(&submission.id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(SubmissionDetail {
            assignment: SubmissionAssignmentInfo {
                id: assignment.id.clone(),
                title: assignment.title.clone(),
                max_score: assignment.max_score,
                due_date: chrono::DateTime::from_timestamp(assignment.due_date, 0)
                    .unwrap_or_default(),
            },
            student: SubmissionStudentInfo {
                id: student.id.clone(),
                full_name: student.name,
                email: student.email,
            },
            files: files.into_iter().map(|m| m.into_submission_file()).collect(),
            grade: grade.map(|m| m.into_grade()),
            submission: submission.into_submission(),
        })
    }

    /// 通过 ID 获取提交附件
    pub async fn get_submission_file_by_id_impl(&self, id: &str) -> Result<Option<SubmissionFile>> {
        let result = SubmissionFiles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交附件失败: {e}")))?;

        Ok(result.map(|m| m.into_submission_file()))
    }

    /// 删除提交附件
    pub async fn delete_submission_file_impl(&self, id: &str) -> Result<bool> {
        let result = SubmissionFiles::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除提交附件失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
