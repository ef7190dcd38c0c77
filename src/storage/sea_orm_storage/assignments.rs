//! 作业与附件存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::attachments::{
    ActiveModel as AttachmentActiveModel, Column as AttachmentColumn, Entity as Attachments,
};
use crate::entity::grades::Entity as Grades;
use crate::entity::submissions::Column as SubmissionColumn;
use crate::entity::users::Entity as Users;
use crate::errors::{LmsError, Result};
use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListItem,
    },
    files::entities::Attachment,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        professor_id: &str,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(req.title),
            description: Set(req.description.unwrap_or_default()),
            due_date: Set(req.due_date.timestamp()),
            max_score: Set(req.max_score.unwrap_or(100)),
            professor_id: Set(professor_id.to_string()),
            course_id: Set(req.course_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: &str) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出全部作业（附教授姓名与附件数量）
    pub async fn list_assignments_impl(&self) -> Result<Vec<AssignmentListItem>> {
        let assignments = Assignments::find()
            .find_also_related(Users)
            .order_by_asc(Column::DueDate)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业列表失败: {e}")))?;

        let counts: Vec<(String, i64)> = Attachments::find()
            .select_only()
            .column(AttachmentColumn::AssignmentId)
            .column_as(AttachmentColumn::Id.count(), "cnt")
            .group_by(AttachmentColumn::AssignmentId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计附件数量失败: {e}")))?;
        let counts: HashMap<String, i64> = counts.into_iter().collect();

        Ok(assignments
            .into_iter()
            .map(|(assignment, professor)| {
                let attachment_count = counts.get(&assignment.id).copied().unwrap_or(0);
                let professor_name = professor.map(|p| p.name).unwrap_or_default();
                AssignmentListItem {
                    assignment: assignment.into_assignment(),
                    professor_name,
                    attachment_count,
                }
            })
            .collect())
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        id: &str,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let existing = self.get_assignment_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(description);
        }

        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date.timestamp());
        }

        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }

        if let Some(course_id) = update.course_id {
            model.course_id = Set(Some(course_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新作业失败: {e}")))?;

        self.get_assignment_by_id_impl(id).await
    }

    /// 删除作业
    /// 删除作业（同事务内清理附件记录，磁盘文件由调用方处理）
    pub async fn delete_assignment_impl(&self, id: &str) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        Attachments::delete_many()
            .filter(AttachmentColumn::AssignmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("清理附件记录失败: {e}")))?;

        let result = Assignments::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 作业下是否已有评分
    pub async fn assignment_has_grades_impl(&self, assignment_id: &str) -> Result<bool> {
        let count = Grades::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::grades::Relation::Submission.def(),
            )
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业评分失败: {e}")))?;

        Ok(count > 0)
    }

    /// 添加作业附件
    pub async fn add_attachment_impl(
        &self,
        assignment_id: &str,
        file_name: &str,
        file_path: &str,
        file_size: i64,
        mime_type: &str,
    ) -> Result<Attachment> {
        let now = chrono::Utc::now().timestamp();

        let model = AttachmentActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            assignment_id: Set(assignment_id.to_string()),
            file_name: Set(file_name.to_string()),
            file_path: Set(file_path.to_string()),
            file_size: Set(file_size),
            mime_type: Set(mime_type.to_string()),
            uploaded_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建附件记录失败: {e}")))?;

        Ok(result.into_attachment())
    }

    /// 通过 ID 获取附件
    pub async fn get_attachment_by_id_impl(&self, id: &str) -> Result<Option<Attachment>> {
        let result = Attachments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询附件失败: {e}")))?;

        Ok(result.map(|m| m.into_attachment()))
    }

    /// 列出作业附件
    pub async fn list_attachments_impl(&self, assignment_id: &str) -> Result<Vec<Attachment>> {
        let attachments = Attachments::find()
            .filter(AttachmentColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(AttachmentColumn::UploadedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询附件列表失败: {e}")))?;

        Ok(attachments.into_iter().map(|m| m.into_attachment()).collect())
    }

    /// 删除附件
    pub async fn delete_attachment_impl(&self, id: &str) -> Result<bool> {
        let result = Attachments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除附件失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
