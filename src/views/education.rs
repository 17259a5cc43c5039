// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::ViewState;
use crate::education::{self, EducationService};
use crate::error::Result;
use crate::models::{
    ContentCategory, Difficulty, EducationalContent, Quiz, QuizResult, UserProgress,
};
use crate::store::SharedStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationData {
    pub content: Vec<EducationalContent>,
    pub progress: Vec<UserProgress>,
}

/// Catalog plus the reader's progress through it.
pub struct EducationView {
    education: EducationService,
    pub state: ViewState<EducationData>,
}

impl EducationView {
    pub fn new(store: SharedStore) -> Self {
        let mut view = EducationView {
            education: EducationService::new(store),
            state: ViewState::default(),
        };
        view.load();
        view
    }

    pub fn load(&mut self) {
        self.state.begin();
        let result = (|| -> Result<EducationData> {
            Ok(EducationData {
                content: self.education.list_content()?,
                progress: self.education.user_progress()?,
            })
        })();
        self.state.finish(result, "Error loading education data");
    }

    pub fn refresh(&mut self) {
        self.load();
    }

    pub fn mark_completed(&mut self, content_id: &str, time_spent: u32) -> Result<UserProgress> {
        let record = self
            .education
            .mark_completed(content_id, time_spent)
            .map_err(|e| self.state.fail("Error marking content as completed", e))?;
        education::upsert_progress(&mut self.state.data.progress, record.clone());
        Ok(record)
    }

    pub fn content(&self) -> &[EducationalContent] {
        &self.state.data.content
    }

    pub fn progress(&self) -> &[UserProgress] {
        &self.state.data.progress
    }

    pub fn content_by_id(&self, id: &str) -> Option<&EducationalContent> {
        self.state.data.content.iter().find(|c| c.id == id)
    }

    pub fn content_by_category(&self, category: ContentCategory) -> Vec<&EducationalContent> {
        self.state
            .data
            .content
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }

    pub fn content_by_difficulty(&self, difficulty: Difficulty) -> Vec<&EducationalContent> {
        self.state
            .data
            .content
            .iter()
            .filter(|c| c.difficulty == difficulty)
            .collect()
    }

    pub fn is_completed(&self, content_id: &str) -> bool {
        education::is_completed(&self.state.data.progress, content_id)
    }

    pub fn completion_rate(&self) -> f64 {
        education::completion_rate(&self.state.data.content, &self.state.data.progress)
    }

    pub fn completed_content(&self) -> Vec<EducationalContent> {
        education::completed_content(&self.state.data.content, &self.state.data.progress)
    }

    pub fn pending_content(&self) -> Vec<EducationalContent> {
        education::pending_content(&self.state.data.content, &self.state.data.progress)
    }

    pub fn total_read_time(&self) -> u64 {
        education::total_read_time(&self.state.data.content)
    }

    pub fn completed_read_time(&self) -> u64 {
        education::completed_read_time(&self.state.data.content, &self.state.data.progress)
    }

    pub fn recommended_content(&self) -> Vec<EducationalContent> {
        education::recommended(&self.state.data.content, &self.state.data.progress)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentData {
    pub content: Option<EducationalContent>,
    pub quiz: Option<Quiz>,
}

/// One article and its quiz.
pub struct ContentView {
    education: EducationService,
    content_id: String,
    pub state: ViewState<ContentData>,
}

impl ContentView {
    pub fn new(store: SharedStore, content_id: &str) -> Self {
        let mut view = ContentView {
            education: EducationService::new(store),
            content_id: content_id.to_string(),
            state: ViewState::default(),
        };
        if !view.content_id.is_empty() {
            view.load();
        }
        view
    }

    pub fn load(&mut self) {
        self.state.begin();
        let result = self.education.content_by_id(&self.content_id).map(|content| ContentData {
            content,
            quiz: self.education.quiz_for(&self.content_id),
        });
        self.state.finish(result, "Error loading content");
    }

    pub fn refresh(&mut self) {
        self.load();
    }

    pub fn content(&self) -> Option<&EducationalContent> {
        self.state.data.content.as_ref()
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.state.data.quiz.as_ref()
    }

    /// Records `score` for this article's quiz. Does nothing without a quiz.
    pub fn submit_quiz_result(&mut self, score: f64) -> Result<Option<QuizResult>> {
        let Some(quiz_id) = self.state.data.quiz.as_ref().map(|q| q.id.clone()) else {
            return Ok(None);
        };
        let result = self
            .education
            .submit_quiz_result(&quiz_id, score)
            .map_err(|e| self.state.fail("Error submitting quiz result", e))?;
        Ok(Some(result))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressData {
    pub progress: Vec<UserProgress>,
    pub completion_rate: f64,
}

/// Reading statistics.
pub struct ProgressView {
    education: EducationService,
    pub state: ViewState<ProgressData>,
}

impl ProgressView {
    pub fn new(store: SharedStore) -> Self {
        let mut view = ProgressView {
            education: EducationService::new(store),
            state: ViewState::default(),
        };
        view.load();
        view
    }

    pub fn load(&mut self) {
        self.state.begin();
        let result = (|| -> Result<ProgressData> {
            Ok(ProgressData {
                progress: self.education.user_progress()?,
                completion_rate: self.education.completion_rate()?,
            })
        })();
        self.state.finish(result, "Error loading progress");
    }

    pub fn refresh(&mut self) {
        self.load();
    }

    pub fn progress(&self) -> &[UserProgress] {
        &self.state.data.progress
    }

    pub fn completion_rate(&self) -> f64 {
        self.state.data.completion_rate
    }

    pub fn progress_for(&self, content_id: &str) -> Option<&UserProgress> {
        self.state
            .data
            .progress
            .iter()
            .find(|p| p.content_id == content_id)
    }

    pub fn is_completed(&self, content_id: &str) -> bool {
        self.progress_for(content_id).is_some_and(|p| p.completed)
    }

    pub fn completed_count(&self) -> usize {
        education::completed_count(&self.state.data.progress)
    }

    pub fn total_time_spent(&self) -> u64 {
        education::total_time_spent(&self.state.data.progress)
    }

    pub fn average_time_per_content(&self) -> f64 {
        education::average_time_per_content(&self.state.data.progress)
    }

    pub fn recently_completed(&self, limit: usize) -> Vec<UserProgress> {
        education::recently_completed(&self.state.data.progress, limit)
    }
}
