// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Article catalog, reading progress and quizzes.

use crate::error::Result;
use crate::models::{
    ContentCategory, Difficulty, EducationalContent, Quiz, QuizQuestion, QuizResult,
    UserProgress,
};
use crate::store::{self, SharedStore, keys};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};

pub const RECENTLY_COMPLETED_LIMIT: usize = 5;

pub type QuizResults = BTreeMap<String, QuizResult>;

#[derive(Clone)]
pub struct EducationService {
    store: SharedStore,
}

impl EducationService {
    pub fn new(store: SharedStore) -> Self {
        EducationService { store }
    }

    pub fn list_content(&self) -> Result<Vec<EducationalContent>> {
        Ok(store::load(self.store.as_ref(), keys::EDUCATIONAL_CONTENT)?.unwrap_or_default())
    }

    pub fn content_by_id(&self, id: &str) -> Result<Option<EducationalContent>> {
        Ok(self.list_content()?.into_iter().find(|c| c.id == id))
    }

    pub fn content_by_category(&self, category: ContentCategory) -> Result<Vec<EducationalContent>> {
        let mut all = self.list_content()?;
        all.retain(|c| c.category == category);
        Ok(all)
    }

    pub fn content_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<EducationalContent>> {
        let mut all = self.list_content()?;
        all.retain(|c| c.difficulty == difficulty);
        Ok(all)
    }

    pub fn user_progress(&self) -> Result<Vec<UserProgress>> {
        Ok(store::load(self.store.as_ref(), keys::USER_PROGRESS)?.unwrap_or_default())
    }

    pub fn mark_completed(&self, content_id: &str, time_spent: u32) -> Result<UserProgress> {
        self.mark_completed_at(content_id, time_spent, Utc::now())
    }

    /// Upserts a completed record for `content_id`, replacing any earlier one.
    pub fn mark_completed_at(
        &self,
        content_id: &str,
        time_spent: u32,
        at: DateTime<Utc>,
    ) -> Result<UserProgress> {
        let record = completed_record(content_id, time_spent, at);
        store::update(
            self.store.as_ref(),
            keys::USER_PROGRESS,
            |progress: &mut Vec<UserProgress>| upsert_progress(progress, record.clone()),
        )?;
        Ok(record)
    }

    pub fn completion_rate(&self) -> Result<f64> {
        Ok(completion_rate(&self.list_content()?, &self.user_progress()?))
    }

    pub fn recommended_content(&self) -> Result<Vec<EducationalContent>> {
        Ok(recommended(&self.list_content()?, &self.user_progress()?))
    }

    pub fn recently_completed(&self, limit: usize) -> Result<Vec<UserProgress>> {
        Ok(recently_completed(&self.user_progress()?, limit))
    }

    /// The same two-question template serves every article for now.
    pub fn quiz_for(&self, content_id: &str) -> Option<Quiz> {
        if content_id.trim().is_empty() {
            return None;
        }
        Some(quiz_template(content_id))
    }

    pub fn submit_quiz_result(&self, quiz_id: &str, score: f64) -> Result<QuizResult> {
        self.submit_quiz_result_at(quiz_id, score, Utc::now())
    }

    /// Records the latest attempt for `quiz_id`, overwriting any earlier one.
    pub fn submit_quiz_result_at(
        &self,
        quiz_id: &str,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<QuizResult> {
        let result = QuizResult {
            score,
            completed_at: at,
        };
        store::update(
            self.store.as_ref(),
            keys::COMPLETED_QUIZZES,
            |results: &mut QuizResults| {
                results.insert(quiz_id.to_string(), result.clone());
            },
        )?;
        Ok(result)
    }

    pub fn quiz_results(&self) -> Result<QuizResults> {
        Ok(store::load(self.store.as_ref(), keys::COMPLETED_QUIZZES)?.unwrap_or_default())
    }
}

pub fn completed_record(content_id: &str, time_spent: u32, at: DateTime<Utc>) -> UserProgress {
    UserProgress {
        content_id: content_id.to_string(),
        completed: true,
        completed_at: Some(at),
        quiz_score: None,
        time_spent,
    }
}

pub fn upsert_progress(progress: &mut Vec<UserProgress>, record: UserProgress) {
    match progress.iter_mut().find(|p| p.content_id == record.content_id) {
        Some(slot) => *slot = record,
        None => progress.push(record),
    }
}

fn completed_ids(progress: &[UserProgress]) -> HashSet<&str> {
    progress
        .iter()
        .filter(|p| p.completed)
        .map(|p| p.content_id.as_str())
        .collect()
}

pub fn is_completed(progress: &[UserProgress], content_id: &str) -> bool {
    progress
        .iter()
        .any(|p| p.content_id == content_id && p.completed)
}

/// Share of catalog items with a completed record, in percent.
///
/// Records pointing at ids outside the catalog are not counted, so the rate
/// never exceeds 100.
pub fn completion_rate(content: &[EducationalContent], progress: &[UserProgress]) -> f64 {
    if content.is_empty() {
        return 0.0;
    }
    let done = completed_ids(progress);
    let completed = content.iter().filter(|c| done.contains(c.id.as_str())).count();
    completed as f64 / content.len() as f64 * 100.0
}

pub fn completed_content(
    content: &[EducationalContent],
    progress: &[UserProgress],
) -> Vec<EducationalContent> {
    let done = completed_ids(progress);
    content
        .iter()
        .filter(|c| done.contains(c.id.as_str()))
        .cloned()
        .collect()
}

pub fn pending_content(
    content: &[EducationalContent],
    progress: &[UserProgress],
) -> Vec<EducationalContent> {
    let done = completed_ids(progress);
    content
        .iter()
        .filter(|c| !done.contains(c.id.as_str()))
        .cloned()
        .collect()
}

/// Pending items, easiest first. Same-difficulty items keep catalog order.
pub fn recommended(
    content: &[EducationalContent],
    progress: &[UserProgress],
) -> Vec<EducationalContent> {
    let mut pending = pending_content(content, progress);
    pending.sort_by_key(|c| c.difficulty.rank());
    pending
}

pub fn recently_completed(progress: &[UserProgress], limit: usize) -> Vec<UserProgress> {
    let mut done: Vec<UserProgress> = progress
        .iter()
        .filter(|p| p.completed && p.completed_at.is_some())
        .cloned()
        .collect();
    done.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    done.truncate(limit);
    done
}

// minute totals are summed as u64
pub fn total_read_time(content: &[EducationalContent]) -> u64 {
    content.iter().map(|c| u64::from(c.estimated_read_time)).sum()
}

pub fn completed_read_time(content: &[EducationalContent], progress: &[UserProgress]) -> u64 {
    total_read_time(&completed_content(content, progress))
}

pub fn completed_count(progress: &[UserProgress]) -> usize {
    progress.iter().filter(|p| p.completed).count()
}

pub fn total_time_spent(progress: &[UserProgress]) -> u64 {
    progress.iter().map(|p| u64::from(p.time_spent)).sum()
}

pub fn average_time_per_content(progress: &[UserProgress]) -> f64 {
    let completed: Vec<&UserProgress> = progress.iter().filter(|p| p.completed).collect();
    if completed.is_empty() {
        return 0.0;
    }
    let total: u64 = completed.iter().map(|p| u64::from(p.time_spent)).sum();
    total as f64 / completed.len() as f64
}

fn quiz_template(content_id: &str) -> Quiz {
    Quiz {
        id: format!("quiz_{}", content_id),
        content_id: content_id.to_string(),
        title: "Knowledge Check".to_string(),
        questions: vec![
            QuizQuestion {
                id: "1".to_string(),
                question: "What is the 50/30/20 rule in personal finance?".to_string(),
                options: vec![
                    "50% expenses, 30% savings, 20% investments".to_string(),
                    "50% needs, 30% wants, 20% savings and investments".to_string(),
                    "50% income, 30% expenses, 20% debt".to_string(),
                    "50% investments, 30% expenses, 20% savings".to_string(),
                ],
                correct_answer: 1,
                explanation: "The 50/30/20 rule puts 50% of income toward needs, 30% toward \
                              wants and 20% toward savings and investments."
                    .to_string(),
            },
            QuizQuestion {
                id: "2".to_string(),
                question: "What matters most when building a budget?".to_string(),
                options: vec![
                    "Having the most expensive software".to_string(),
                    "Being realistic about income and expenses".to_string(),
                    "Copying someone else's budget".to_string(),
                    "Only looking at large expenses".to_string(),
                ],
                correct_answer: 1,
                explanation: "A budget is only useful and sustainable when it is built on your \
                              real income and expenses."
                    .to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn upsert_replaces_existing_record() {
        let mut progress = vec![completed_record("1", 10, at("2025-01-01T00:00:00Z"))];
        upsert_progress(&mut progress, completed_record("1", 3, at("2025-01-02T00:00:00Z")));
        upsert_progress(&mut progress, completed_record("2", 4, at("2025-01-03T00:00:00Z")));
        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].time_spent, 3);
    }

    #[test]
    fn recently_completed_is_newest_first_and_truncated() {
        let mut progress = Vec::new();
        for (i, ts) in ["2025-01-03T00:00:00Z", "2025-01-01T00:00:00Z", "2025-01-02T00:00:00Z"]
            .iter()
            .enumerate()
        {
            progress.push(completed_record(&i.to_string(), 0, at(ts)));
        }
        progress.push(UserProgress {
            content_id: "x".into(),
            completed: true,
            completed_at: None,
            quiz_score: None,
            time_spent: 0,
        });
        let recent = recently_completed(&progress, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content_id, "0");
        assert_eq!(recent[1].content_id, "2");
    }

    #[test]
    fn quiz_scores_by_correct_answers() {
        let quiz = quiz_template("7");
        assert_eq!(quiz.id, "quiz_7");
        assert_eq!(quiz.score(&[1, 1]), 100.0);
        assert_eq!(quiz.score(&[1, 0]), 50.0);
        assert_eq!(quiz.score(&[]), 0.0);
    }

    #[test]
    fn average_time_ignores_incomplete_records() {
        let mut progress = vec![
            completed_record("1", 10, at("2025-01-01T00:00:00Z")),
            completed_record("2", 20, at("2025-01-01T00:00:00Z")),
        ];
        progress.push(UserProgress {
            content_id: "3".into(),
            completed: false,
            completed_at: None,
            quiz_score: None,
            time_spent: 90,
        });
        assert_eq!(average_time_per_content(&progress), 15.0);
        assert_eq!(total_time_spent(&progress), 120);
        assert_eq!(completed_count(&progress), 2);
        assert_eq!(average_time_per_content(&[]), 0.0);
    }

    #[test]
    fn time_totals_do_not_overflow_u32() {
        let progress = vec![
            completed_record("1", u32::MAX, at("2025-01-01T00:00:00Z")),
            completed_record("2", 1, at("2025-01-02T00:00:00Z")),
        ];
        assert_eq!(total_time_spent(&progress), u64::from(u32::MAX) + 1);
        assert_eq!(average_time_per_content(&progress), (u64::from(u32::MAX) + 1) as f64 / 2.0);
    }
}
