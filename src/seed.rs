// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Default data written once at startup into collections that do not exist yet.

use crate::error::Result;
use crate::models::{
    BudgetCategory, ContentCategory, Difficulty, EducationalContent, Transaction,
    TransactionKind,
};
use crate::store::{Expect, KvStore, keys};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Collections written by [`initialize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: Vec<&'static str>,
}

/// Seeds transactions, budget categories and the article catalog.
///
/// A collection that exists, even as an empty list, is left alone.
pub fn initialize(store: &dyn KvStore, today: NaiveDate, now: DateTime<Utc>) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    if seed_if_absent(store, keys::TRANSACTIONS, &default_transactions(today))? {
        report.seeded.push(keys::TRANSACTIONS);
    }
    if seed_if_absent(store, keys::BUDGET_CATEGORIES, &default_categories())? {
        report.seeded.push(keys::BUDGET_CATEGORIES);
    }
    if seed_if_absent(store, keys::EDUCATIONAL_CONTENT, &default_content(now))? {
        report.seeded.push(keys::EDUCATIONAL_CONTENT);
    }
    Ok(report)
}

fn seed_if_absent<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<bool> {
    if store.get(key)?.is_some() {
        return Ok(false);
    }
    let json = serde_json::to_string(value)
        .map_err(|e| crate::error::StorageError::json(key, e))?;
    match store.put(key, &json, Expect::Absent) {
        Ok(_) => {
            debug!("seeded '{}'", key);
            Ok(true)
        }
        // someone else seeded it first
        Err(e) if e.is_conflict() => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn default_transactions(today: NaiveDate) -> Vec<Transaction> {
    let tx = |id: &str, kind, amount: Decimal, category: &str, description: &str| Transaction {
        id: id.to_string(),
        kind,
        amount,
        category: category.to_string(),
        description: description.to_string(),
        date: today,
        user_id: None,
    };
    vec![
        tx("1", TransactionKind::Expense, Decimal::new(2550, 2), "Food", "Lunch at a restaurant"),
        tx("2", TransactionKind::Income, Decimal::new(3000, 0), "Salary", "Monthly salary"),
        tx("3", TransactionKind::Expense, Decimal::new(120, 0), "Transport", "Gas"),
    ]
}

pub fn default_categories() -> Vec<BudgetCategory> {
    let cat = |id: &str, name: &str, budget: i64, spent: i64, color: &str, icon: &str| {
        BudgetCategory {
            id: id.to_string(),
            name: name.to_string(),
            budget: Decimal::from(budget),
            spent: Decimal::from(spent),
            color: color.to_string(),
            icon: icon.to_string(),
            user_id: None,
        }
    };
    vec![
        cat("1", "Food", 500, 320, "#FF6B6B", "🍽️"),
        cat("2", "Transport", 200, 150, "#4ECDC4", "🚗"),
        cat("3", "Entertainment", 300, 180, "#45B7D1", "🎬"),
        cat("4", "Health", 150, 75, "#96CEB4", "🏥"),
        cat("5", "Education", 200, 200, "#FECA57", "🏫"),
        cat("6", "Shopping", 400, 450, "#FF9FF3", "🛍️"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn article(
    id: &str,
    title: &str,
    description: &str,
    content: &str,
    category: ContentCategory,
    difficulty: Difficulty,
    minutes: u32,
    icon: &str,
    tags: &[&str],
    now: DateTime<Utc>,
) -> EducationalContent {
    EducationalContent {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        content: content.trim().to_string(),
        category,
        difficulty,
        estimated_read_time: minutes,
        icon: icon.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: now,
        updated_at: now,
    }
}

pub fn default_content(now: DateTime<Utc>) -> Vec<EducationalContent> {
    vec![
        article(
            "1",
            "Personal Finance Fundamentals",
            "Learn the basic concepts for managing your money wisely.",
            BASICS,
            ContentCategory::Basics,
            Difficulty::Beginner,
            8,
            "💰",
            &["fundamentals", "budget", "saving"],
            now,
        ),
        article(
            "2",
            "How to Build an Effective Budget",
            "Master planning your spending and maximizing your savings.",
            BUDGETING,
            ContentCategory::Budgeting,
            Difficulty::Beginner,
            12,
            "📊",
            &["budget", "planning", "control"],
            now,
        ),
        article(
            "3",
            "Smart Saving Strategies",
            "Proven techniques to save more without sacrificing quality of life.",
            SAVINGS,
            ContentCategory::Savings,
            Difficulty::Intermediate,
            10,
            "🏦",
            &["saving", "strategies", "goals"],
            now,
        ),
        article(
            "4",
            "Introduction to Investing",
            "Start investing with solid knowledge and proven strategies.",
            INVESTING,
            ContentCategory::Investing,
            Difficulty::Intermediate,
            15,
            "📈",
            &["investing", "risk", "diversification", "returns"],
            now,
        ),
        article(
            "5",
            "Managing Debt Wisely",
            "Effective strategies to get out of debt and keep a healthy credit history.",
            DEBT,
            ContentCategory::Debt,
            Difficulty::Intermediate,
            13,
            "💳",
            &["debt", "credit", "strategies", "history"],
            now,
        ),
    ]
}

const BASICS: &str = r#"
# Personal Finance Fundamentals

## What is personal finance?
Personal finance is the management of your money: income, expenses, savings and
investments. It is the foundation for financial stability and for reaching your goals.

## Key concepts
### 1. Income
All the money you receive, from work, investments or other sources.
### 2. Expenses
All the money that leaves your pocket to cover needs and wants.
### 3. Budget
A plan that helps you control income and expenses.
### 4. Savings
Money you set aside for future goals or emergencies.
### 5. Investments
Money you put to work to generate more money in the future.

## The 50/30/20 rule
- **50%** for needs (housing, food, transport)
- **30%** for wants (entertainment, hobbies)
- **20%** for savings and investments

## First steps
1. Add up your total income
2. List every expense
3. Find where you can save
4. Build an emergency fund
5. Set clear financial goals

Discipline and consistency are the keys to financial success.
"#;

const BUDGETING: &str = r#"
# How to Build an Effective Budget

## Why you need a budget
A budget gives you control over your money and helps you:
- Avoid unnecessary spending
- Reach your financial goals
- Reduce financial stress
- Prepare for emergencies

## Steps
### 1. Calculate your net income
Add up all income after taxes.
### 2. List fixed expenses
- Rent or mortgage
- Utilities
- Insurance
- Minimum debt payments
### 3. Identify variable expenses
- Food
- Transport
- Entertainment
- Clothing
### 4. Allocate money for savings
Treat saving as a fixed expense.
### 5. Adjust as needed
If you spend more than you earn, find areas to cut.

## Budgeting methods
### 50/30/20
50% needs, 30% wants, 20% savings and debt.
### Zero-based budget
Every unit of money gets a specific job.
### Envelope method
Use cash envelopes for each category.

## Keeping your budget
- Review it weekly
- Track spending with an app
- Be realistic with your goals
- Allow some flexibility
- Celebrate your wins
"#;

const SAVINGS: &str = r#"
# Smart Saving Strategies

## Why save?
Saving gives you security, freedom to make decisions, the ability to seize
opportunities and peace of mind.

## Strategies
### 1. Pay yourself first
Set up automatic transfers to a savings account.
### 2. The 24-hour rule
Wait 24 hours before buying anything non-essential.
### 3. The coin jar
Put away all your coins at the end of each day.
### 4. The 52-week challenge
Save 1 the first week, 2 the second, and so on.
### 5. Cut small leaks
Identify small daily purchases that add up.

## Kinds of savings
### Emergency fund
3 to 6 months of basic expenses, easy to reach, in a separate account.
### Goal savings
Holidays, a new car, education, a home.
### Retirement savings
Pensions and long-term investments.

## Common mistakes
- Not automating savings
- Unrealistic goals
- Mixing different savings pots
- Dipping into savings often
"#;

const INVESTING: &str = r#"
# Introduction to Investing

## What is investing?
Investing is putting your money to work to generate more money over time,
taking advantage of compound interest.

## Basic concepts
### Risk vs. return
Higher risk means higher potential return; lower risk means lower expected return.
### Diversification
Do not put all your eggs in one basket.
### Time horizon
- Short term: under 2 years
- Medium term: 2 to 10 years
- Long term: over 10 years

## Kinds of investments
### Fixed income
Government bonds and bank notes. Low risk, moderate return.
### Equities
Individual stocks, mutual funds and ETFs. High risk, high potential return.
### Real estate
Direct property or REITs. Moderate risk, moderate to high return.
### Commodities
Gold, silver, oil. High risk, variable return.

## Principles
1. Start early
2. Invest regularly
3. Diversify
4. Stay calm
5. Keep learning

## Before you invest
1. Have an emergency fund
2. Pay off high-interest debt
3. Define your goals
4. Know your risk tolerance
5. Learn about your options
"#;

const DEBT: &str = r#"
# Managing Debt Wisely

## What is debt?
Debt is money you owe to others. It can be a useful tool or a financial burden,
depending on how you handle it.

## Kinds of debt
### Good debt
Borrowing that can grow your net worth: a home mortgage, student loans, business credit.
### Bad debt
Borrowing for things that lose value: consumer credit cards, luxury car loans.

## Paying it down
### Snowball method
1. List debts from smallest to largest balance
2. Pay the minimum on all of them
3. Put extra money on the smallest
4. Repeat with the next one
### Avalanche method
1. List debts from highest to lowest interest rate
2. Pay the minimum on all of them
3. Put extra money on the highest rate
4. Repeat with the next one
### Consolidation
Combine several debts into one with a better rate.

## Improving your credit history
- Payment history (35%)
- Credit utilization (30%)
- Length of history (15%)
- New accounts (10%)
- Credit mix (10%)

## Warning signs
- You only pay minimums
- You use one card to pay another
- Total debt exceeds 40% of your income
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, load};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn seeds_absent_collections_once() {
        let store = MemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let first = initialize(&store, today, now()).unwrap();
        assert_eq!(first.seeded.len(), 3);
        let second = initialize(&store, today, now()).unwrap();
        assert!(second.seeded.is_empty());

        let txs: Vec<Transaction> = load(&store, keys::TRANSACTIONS).unwrap().unwrap();
        assert_eq!(txs.len(), 3);
        let cats: Vec<BudgetCategory> = load(&store, keys::BUDGET_CATEGORIES).unwrap().unwrap();
        assert_eq!(cats.len(), 6);
        let content: Vec<EducationalContent> =
            load(&store, keys::EDUCATIONAL_CONTENT).unwrap().unwrap();
        assert_eq!(content.len(), 5);
    }

    #[test]
    fn empty_collection_is_not_reseeded() {
        let store = MemoryStore::new();
        crate::store::save(&store, keys::TRANSACTIONS, &Vec::<Transaction>::new()).unwrap();
        let report = initialize(&store, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), now()).unwrap();
        assert!(!report.seeded.contains(&keys::TRANSACTIONS));
        let txs: Vec<Transaction> = load(&store, keys::TRANSACTIONS).unwrap().unwrap();
        assert!(txs.is_empty());
    }
}
