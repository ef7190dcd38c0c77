//! 评分存储操作

use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::entity::prelude::{Assignments, Users};
use crate::entity::submissions::{
    ActiveModel as SubmissionActiveModel, Column as SubmissionColumn, Entity as Submissions,
};
use crate::errors::{LmsError, Result};
use crate::models::{
    grades::{
        entities::Grade,
        requests::{GradeSubmissionRequest, UpdateGradeRequest},
        responses::GradeDetail,
    },
    submissions::entities::SubmissionStatus,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

impl SeaOrmStorage {
    /// 评分/重新评分
    ///
    /// 同一提交只保留一条评分记录。评分与提交状态的变更在同一事务内完成，
    /// 避免出现"有评分但状态仍为待评分"的中间态。
    pub async fn upsert_grade_impl(
        &self,
        grader_id: &str,
        submission_id: &str,
        req: GradeSubmissionRequest,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Grades::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询评分失败: {e}")))?;

        let grade = match existing {
            Some(grade) => {
                let model = ActiveModel {
                    id: Set(grade.id.clone()),
                    score: Set(req.score),
                    feedback: Set(req.feedback),
                    graded_by: Set(grader_id.to_string()),
                    graded_at: Set(now),
                    ..Default::default()
                };
                model
                    .update(&txn)
                    .await
                    .map_err(|e| LmsError::database_operation(format!("更新评分失败: {e}")))?
            }
            None => {
                let model = ActiveModel {
                    id: Set(Uuid::new_v4().to_string()),
                    submission_id: Set(submission_id.to_string()),
                    score: Set(req.score),
                    feedback: Set(req.feedback),
                    graded_by: Set(grader_id.to_string()),
                    graded_at: Set(now),
                };
                model.insert(&txn).await.map_err(LmsError::from)?
            }
        };

        Self::set_submission_status(&txn, submission_id, SubmissionStatus::Graded).await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(grade.into_grade())
    }

    /// 通过 ID 获取评分
    pub async fn get_grade_by_id_impl(&self, id: &str) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 更新评分
    pub async fn update_grade_impl(
        &self,
        id: &str,
        update: UpdateGradeRequest,
    ) -> Result<Option<Grade>> {
        let existing = self.get_grade_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id.to_string()),
            graded_at: Set(now),
            ..Default::default()
        };

        if let Some(score) = update.score {
            model.score = Set(score);
        }

        if let Some(feedback) = update.feedback {
            model.feedback = Set(Some(feedback));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新评分失败: {e}")))?;

        self.get_grade_by_id_impl(id).await
    }

    /// 删除评分
    ///
    /// 事务内同时将对应提交状态回退为待评分。
    pub async fn delete_grade_impl(&self, id: &str) -> Result<bool> {
        let Some(grade) = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询评分失败: {e}")))?
        else {
            return Ok(false);
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let result = Grades::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除评分失败: {e}")))?;

        Self::set_submission_status(&txn, &grade.submission_id, SubmissionStatus::Pending).await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出学生的评分（附作业信息）
    pub async fn list_grades_by_student_impl(&self, student_id: &str) -> Result<Vec<GradeDetail>> {
        let submissions = Submissions::find()
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        let mut details = Vec::new();
        for submission in submissions {
            let Some(grade) = Grades::find()
                .filter(Column::SubmissionId.eq(&submission.id))
                .one(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询评分失败: {e}")))?
            else {
                continue;
            };
            details.push(self.assemble_grade_detail(grade, submission).await?);
        }

        details.sort_by(|a, b| b.grade.graded_at.cmp(&a.grade.graded_at));
        Ok(details)
    }

    /// 列出作业下的评分（附学生信息）
    pub async fn list_grades_for_assignment_impl(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<GradeDetail>> {
        let submissions = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .order_by_desc(SubmissionColumn::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        let mut details = Vec::new();
        for submission in submissions {
            let Some(grade) = Grades::find()
                .filter(Column::SubmissionId.eq(&submission.id))
                .one(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询评分失败: {e}")))?
            else {
                continue;
            };
            details.push(self.assemble_grade_detail(grade, submission).await?);
        }

        Ok(details)
    }

    /// 拼装评分详情
    async fn assemble_grade_detail(
        &self,
        grade: crate::entity::grades::Model,
        submission: crate::entity::submissions::Model,
    ) -> Result<GradeDetail> {
        let assignment = Assignments::find_by_id(&submission.assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?
            .ok_or_else(|| {
                LmsError::not_found(format!("评分关联的作业不存在: {}", submission.assignment_id))
            })?;

        let student = Users::find_by_id(&submission.student_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学生失败: {e}")))?
            .ok_or_else(|| {
                LmsError::not_found(format!("评分关联的学生不存在: {}", submission.student_id))
            })?;

        Ok(GradeDetail {
            grade: grade.into_grade(),
            assignment_id: assignment.id,
            assignment_title: assignment.title,
            max_score: assignment.max_score,
            student_id: student.id,
            student_name: student.name,
        })
    }

    /// 在事务内更新提交状态
    async fn set_submission_status(
        txn: &DatabaseTransaction,
        submission_id: &str,
        status: SubmissionStatus,
    ) -> Result<()> {
        let model = SubmissionActiveModel {
            id: Set(submission_id.to_string()),
            status: Set(status.to_string()),
            ..Default::default()
        };

        model
            .update(txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新提交状态失败: {e}")))?;

        Ok(())
    }
}
