//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::users::Entity as Users;
use crate::errors::{LmsError, Result};
use crate::models::courses::{
    entities::Course,
    requests::{CreateCourseRequest, UpdateCourseRequest},
    responses::{CourseListItem, CourseStudent},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(
        &self,
        professor_id: &str,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(req.name),
            professor_id: Set(professor_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, id: &str) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 列出全部课程（附教授姓名与选课人数）
    pub async fn list_courses_impl(&self) -> Result<Vec<CourseListItem>> {
        let courses = Courses::find()
            .find_also_related(Users)
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程列表失败: {e}")))?;

        // 一次查出各课程的选课人数
        let counts: Vec<(String, i64)> = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::CourseId)
            .column_as(EnrollmentColumn::Id.count(), "cnt")
            .group_by(EnrollmentColumn::CourseId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计选课人数失败: {e}")))?;
        let counts: HashMap<String, i64> = counts.into_iter().collect();

        Ok(courses
            .into_iter()
            .map(|(course, professor)| {
                let student_count = counts.get(&course.id).copied().unwrap_or(0);
                let professor_name = professor.map(|p| p.name).unwrap_or_default();
                CourseListItem {
                    course: course.into_course(),
                    professor_name,
                    student_count,
                }
            })
            .collect())
    }

    /// 更新课程
    pub async fn update_course_impl(
        &self,
        id: &str,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let existing = self.get_course_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_course_by_id_impl(id).await
    }

    /// 删除课程
    /// 删除课程（同事务内清理选课记录）
    pub async fn delete_course_impl(&self, id: &str) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        Enrollments::delete_many()
            .filter(EnrollmentColumn::CourseId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("清理选课记录失败: {e}")))?;

        let result = Courses::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除课程失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 选课（重复选课由唯一索引拦截并映射为冲突错误）
    pub async fn enroll_student_impl(&self, course_id: &str, student_id: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        let model = EnrollmentActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            course_id: Set(course_id.to_string()),
            student_id: Set(student_id.to_string()),
            created_at: Set(now),
        };

        model.insert(&self.db).await.map_err(LmsError::from)?;

        Ok(())
    }

    /// 退课
    pub async fn remove_student_impl(&self, course_id: &str, student_id: &str) -> Result<bool> {
        let result = Enrollments::delete_many()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("退课失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出课程学生
    pub async fn list_course_students_impl(&self, course_id: &str) -> Result<Vec<CourseStudent>> {
        let enrollments = Enrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .find_also_related(Users)
            .order_by_asc(EnrollmentColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程学生失败: {e}")))?;

        Ok(enrollments
            .into_iter()
            .filter_map(|(enrollment, student)| {
                student.map(|s| CourseStudent {
                    id: s.id,
                    full_name: s.name,
                    email: s.email,
                    enrolled_at: chrono::DateTime::from_timestamp(enrollment.created_at, 0)
                        .unwrap_or_default(),
                })
            })
            .collect())
    }
}
