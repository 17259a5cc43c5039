// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::ensure_loaded;
use crate::models::{ContentCategory, Difficulty, EducationalContent};
use crate::store::SharedStore;
use crate::utils::{fmt_pct, maybe_print_json, pretty_table};
use crate::views::{ContentView, EducationView, ProgressView};
use anyhow::{Context, Result, bail};
use serde_json::json;

pub fn handle(store: &SharedStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("show", sub)) => show(store, sub)?,
        Some(("complete", sub)) => complete(store, sub)?,
        Some(("progress", sub)) => progress(store, sub)?,
        Some(("recommend", sub)) => recommend(store, sub)?,
        Some(("quiz", sub)) => quiz(store, sub)?,
        Some(("submit", sub)) => submit(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn content_rows(items: &[&EducationalContent], view: &EducationView) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                format!("{} {}", c.icon, c.title),
                c.category.as_str().to_string(),
                c.difficulty.as_str().to_string(),
                format!("{} min", c.estimated_read_time),
                if view.is_completed(&c.id) { "✓".into() } else { String::new() },
            ]
        })
        .collect()
}

const CONTENT_HEADERS: [&str; 6] = ["Id", "Title", "Category", "Difficulty", "Read time", "Done"];

fn list(store: &SharedStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let view = EducationView::new(store.clone());
    ensure_loaded(&view.state)?;

    let mut items: Vec<&EducationalContent> = match sub.get_one::<String>("category") {
        Some(c) => {
            let cat = ContentCategory::parse(c).with_context(|| format!("Unknown category '{}'", c))?;
            view.content_by_category(cat)
        }
        None => view.content().iter().collect(),
    };
    if let Some(d) = sub.get_one::<String>("difficulty") {
        let diff = Difficulty::parse(d).with_context(|| format!("Unknown difficulty '{}'", d))?;
        let matching: Vec<&str> = view
            .content_by_difficulty(diff)
            .into_iter()
            .map(|c| c.id.as_str())
            .collect();
        items.retain(|c| matching.contains(&c.id.as_str()));
    }

    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        println!("{}", pretty_table(&CONTENT_HEADERS, content_rows(&items, &view)));
        println!(
            "Completed {} of {} ({}), {} of {} min read",
            view.completed_content().len(),
            view.content().len(),
            fmt_pct(view.completion_rate()),
            view.completed_read_time(),
            view.total_read_time()
        );
    }
    Ok(())
}

fn show(store: &SharedStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").context("missing id")?.trim();
    let view = ContentView::new(store.clone(), id);
    ensure_loaded(&view.state)?;
    let Some(c) = view.content() else {
        bail!("No content with id {}", id);
    };
    println!("{} {}\n", c.icon, c.title);
    println!("{}\n", c.description);
    println!("{}", c.content);
    println!(
        "\n[{} · {} · {} min · {}]",
        c.category.as_str(),
        c.difficulty.as_str(),
        c.estimated_read_time,
        c.tags.join(", ")
    );
    Ok(())
}

fn complete(store: &SharedStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").context("missing id")?.trim();
    let minutes = *sub.get_one::<u32>("minutes").unwrap_or(&0);
    let mut view = EducationView::new(store.clone());
    ensure_loaded(&view.state)?;
    if view.content_by_id(id).is_none() {
        bail!("No content with id {}", id);
    }
    view.mark_completed(id, minutes)?;
    println!(
        "Marked '{}' as completed; {} done",
        id,
        fmt_pct(view.completion_rate())
    );
    Ok(())
}

fn progress(store: &SharedStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&crate::education::RECENTLY_COMPLETED_LIMIT);
    let view = ProgressView::new(store.clone());
    ensure_loaded(&view.state)?;
    let recent = view.recently_completed(limit);
    let out = json!({
        "completionRate": view.completion_rate(),
        "completedCount": view.completed_count(),
        "totalTimeSpent": view.total_time_spent(),
        "averageTimePerContent": view.average_time_per_content(),
        "recentlyCompleted": recent,
    });
    if !maybe_print_json(json_flag, jsonl_flag, &out)? {
        println!(
            "Completion {} · {} completed · {} min total · {:.1} min avg",
            fmt_pct(view.completion_rate()),
            view.completed_count(),
            view.total_time_spent(),
            view.average_time_per_content()
        );
        let rows = recent
            .iter()
            .map(|p| {
                vec![
                    p.content_id.clone(),
                    p.completed_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
                    format!("{} min", p.time_spent),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Content", "Completed at", "Time"], rows));
    }
    Ok(())
}

fn recommend(store: &SharedStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let view = EducationView::new(store.clone());
    ensure_loaded(&view.state)?;
    let items = view.recommended_content();
    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        let refs: Vec<&EducationalContent> = items.iter().collect();
        println!("{}", pretty_table(&CONTENT_HEADERS, content_rows(&refs, &view)));
    }
    Ok(())
}

fn quiz(store: &SharedStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = sub.get_one::<String>("id").context("missing id")?.trim();
    let view = ContentView::new(store.clone(), id);
    ensure_loaded(&view.state)?;
    let Some(quiz) = view.quiz() else {
        bail!("No quiz for content {}", id);
    };
    if !maybe_print_json(json_flag, jsonl_flag, quiz)? {
        println!("{}", quiz.title);
        for (n, q) in quiz.questions.iter().enumerate() {
            println!("\n{}. {}", n + 1, q.question);
            for (i, opt) in q.options.iter().enumerate() {
                println!("   [{}] {}", i, opt);
            }
        }
    }
    Ok(())
}

fn submit(store: &SharedStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").context("missing id")?.trim();
    let answers: Vec<usize> = sub
        .get_many::<usize>("answers")
        .map(|v| v.copied().collect())
        .unwrap_or_default();
    let mut view = ContentView::new(store.clone(), id);
    ensure_loaded(&view.state)?;
    let Some(quiz) = view.quiz().cloned() else {
        bail!("No quiz for content {}", id);
    };
    let score = quiz.score(&answers);
    view.submit_quiz_result(score)?;
    println!("Score: {}", fmt_pct(score));
    for (q, a) in quiz.questions.iter().zip(&answers) {
        if q.correct_answer != *a {
            println!("- {} {}", q.question, q.explanation);
        }
    }
    Ok(())
}
