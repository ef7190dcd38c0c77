use serde::{Deserialize, Serialize};

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub description: String,
    // 截止时间
    pub due_date: chrono::DateTime<chrono::Utc>,
    // 满分
    pub max_score: i32,
    pub professor_id: String,
    pub course_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 截止时间是否已过
    pub fn is_past_due(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        now > self.due_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_is_past_due() {
        let a = Assignment {
            id: "a1".into(),
            title: "t".into(),
            description: String::new(),
            due_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            max_score: 100,
            professor_id: "p1".into(),
            course_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!a.is_past_due(Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap()));
        assert!(a.is_past_due(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 1).unwrap()));
    }
}
