use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::entities::Assignment,
    auth::entities::AuthedUser,
    grades::{
        requests::{GradeSubmissionRequest, UpdateGradeRequest},
        responses::GradeResponse,
    },
    submissions::entities::Submission,
    users::entities::UserRole,
};
use crate::storage::Storage;

use super::GradeService;

pub async fn handle_grade_submission(
    service: &GradeService,
    submission_id: String,
    grade_request: GradeSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let authed = match require_grader(request) {
        Ok(authed) => authed,
        Err(response) => return Ok(response),
    };

    let storage = service.get_storage(request);

    let submission = match storage.get_submission_by_id(&submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    let assignment =
        match load_parent_assignment(storage.as_ref(), &submission, &authed).await {
            Ok(assignment) => assignment,
            Err(response) => return Ok(response),
        };

    // 分数必须落在 [0, max_score] 内，越界时不产生任何变更
    if !score_within(grade_request.score, assignment.max_score) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidScore,
            format!("Score must be between 0 and {}", assignment.max_score),
        )));
    }

    match storage
        .upsert_grade(&authed.id, &submission_id, grade_request)
        .await
    {
        Ok(grade) => {
            tracing::info!(
                "Submission {} graded {} by {}",
                submission_id,
                grade.score,
                authed.email
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(GradeResponse { grade }, "评分成功")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("评分失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_update_grade(
    service: &GradeService,
    grade_id: String,
    update_request: UpdateGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let authed = match require_grader(request) {
        Ok(authed) => authed,
        Err(response) => return Ok(response),
    };

    let storage = service.get_storage(request);

    let grade = match storage.get_grade_by_id(&grade_id).await {
        Ok(Some(grade)) => grade,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GradeNotFound,
                "Grade not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询评分失败: {e}"),
                )),
            );
        }
    };

    let submission = match storage.get_submission_by_id(&grade.submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    let assignment =
        match load_parent_assignment(storage.as_ref(), &submission, &authed).await {
            Ok(assignment) => assignment,
            Err(response) => return Ok(response),
        };

    if let Some(score) = update_request.score
        && !score_within(score, assignment.max_score)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidScore,
            format!("Score must be between 0 and {}", assignment.max_score),
        )));
    }

    match storage.update_grade(&grade_id, update_request).await {
        Ok(Some(grade)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(GradeResponse { grade }, "评分更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新评分失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_delete_grade(
    service: &GradeService,
    grade_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let authed = match require_grader(request) {
        Ok(authed) => authed,
        Err(response) => return Ok(response),
    };

    let storage = service.get_storage(request);

    let grade = match storage.get_grade_by_id(&grade_id).await {
        Ok(Some(grade)) => grade,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GradeNotFound,
                "Grade not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询评分失败: {e}"),
                )),
            );
        }
    };

    if let Ok(Some(submission)) = storage.get_submission_by_id(&grade.submission_id).await
        && let Err(response) =
            load_parent_assignment(storage.as_ref(), &submission, &authed).await
    {
        return Ok(response);
    }

    // 删除评分并把提交状态回退为待评分，两步在同一事务内完成
    match storage.delete_grade(&grade_id).await {
        Ok(true) => {
            tracing::info!("Grade {} removed by {}", grade_id, authed.email);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("评分已撤销")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("撤销评分失败: {e}"),
            )),
        ),
    }
}

/// 有效分数为 [0, max_score] 的整数
fn score_within(score: i32, max_score: i32) -> bool {
    (0..=max_score).contains(&score)
}

/// 评分操作仅对教授和管理员开放
pub(super) fn require_grader(request: &HttpRequest) -> Result<AuthedUser, HttpResponse> {
    let Some(authed) = RequireJWT::extract_user(request) else {
        return Err(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    if authed.role == UserRole::Student {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only professors can grade submissions",
        )));
    }

    Ok(authed)
}

/// 取提交所属作业，并校验当前教授是否有权评分
async fn load_parent_assignment(
    storage: &dyn Storage,
    submission: &Submission,
    authed: &AuthedUser,
) -> Result<Assignment, HttpResponse> {
    let assignment = match storage.get_assignment_by_id(&submission.assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    };

    if authed.role != UserRole::Admin && authed.id != assignment.professor_id {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Not the assignment owner",
        )));
    }

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::score_within;

    #[test]
    fn test_score_bounds() {
        assert!(score_within(0, 100));
        assert!(score_within(100, 100));
        assert!(!score_within(101, 100));
        assert!(!score_within(-1, 100));
    }
}
