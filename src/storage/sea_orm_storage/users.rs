//! 用户存储操作

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{LmsError, Result};
use crate::models::users::{
    entities::{User, UserRole, UserStatus},
    requests::CreateUserData,
    responses::StudentSummary,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, data: CreateUserData) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(data.email),
            password_hash: Set(data.password_hash),
            name: Set(data.full_name),
            role: Set(data.role.to_string()),
            status: Set(data.status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(LmsError::from)?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: &str) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 列出全部学生名册（供教授/管理员录入选课使用）
    pub async fn list_students_impl(&self) -> Result<Vec<StudentSummary>> {
        let users = Users::find()
            .filter(Column::Role.eq(UserRole::Student.to_string()))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学生名册失败: {e}")))?;

        Ok(users
            .into_iter()
            .map(|m| StudentSummary {
                id: m.id,
                full_name: m.name,
                email: m.email,
            })
            .collect())
    }

    /// 列出待审批用户
    pub async fn list_pending_users_impl(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(Column::Status.eq(UserStatus::Pending.to_string()))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询待审批用户失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 更新用户审批状态
    pub async fn update_user_status_impl(
        &self,
        id: &str,
        status: UserStatus,
    ) -> Result<Option<User>> {
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(id.to_string()),
            status: Set(status.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新用户状态失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 更新用户资料（邮箱重复由唯一约束拦截并映射为冲突错误）
    pub async fn update_user_profile_impl(
        &self,
        id: &str,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>> {
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(full_name) = full_name {
            model.name = Set(full_name.to_string());
        }

        if let Some(email) = email {
            model.email = Set(email.to_string());
        }

        model.update(&self.db).await.map_err(LmsError::from)?;

        self.get_user_by_id_impl(id).await
    }

    /// 更新用户密码哈希
    pub async fn update_user_password_impl(&self, id: &str, password_hash: &str) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(
                Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新用户密码失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}
