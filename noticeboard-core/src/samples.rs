/// Starter notices used to seed an empty board.
use chrono::{DateTime, Duration, Utc};

use crate::types::{Category, Notice, Priority};

fn sample(
    id: &str,
    title: &str,
    content: &str,
    category: Category,
    priority: Priority,
    deadline_days: Option<i64>,
    author: &str,
    now: DateTime<Utc>,
) -> Notice {
    let today = now.date_naive();
    Notice {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        category,
        priority,
        date: today,
        deadline: deadline_days.map(|d| today + Duration::days(d)),
        author: author.to_string(),
        tags: Vec::new(),
        attachments: None,
        has_attachments: None,
        attachment_count: None,
        display_order: None,
        timestamp: now,
        last_modified: None,
    }
}

/// The five sample notices, dated relative to `now`.
pub fn sample_notices(now: DateTime<Utc>) -> Vec<Notice> {
    vec![
        sample(
            "1",
            "Mid-Semester Examination Schedule Released",
            "The mid-semester examination schedule for all departments has been published. Students are advised to check their respective department notice boards and prepare accordingly.",
            Category::Exams,
            Priority::High,
            Some(7),
            "Examination Controller",
            now,
        ),
        sample(
            "2",
            "Assignment Submission - Database Systems",
            "Final assignment for Database Systems course is due tomorrow. Late submissions will not be accepted without prior approval.",
            Category::Academic,
            Priority::Critical,
            Some(1),
            "Computer Science Department",
            now,
        ),
        sample(
            "3",
            "Library Timings Extended",
            "Due to upcoming examinations, the library timings have been extended. The library will now remain open from 8:00 AM to 10:00 PM on weekdays.",
            Category::Academic,
            Priority::Normal,
            None,
            "Library Administration",
            now,
        ),
        sample(
            "4",
            "Fee Payment Overdue Notice",
            "Students who have not paid their semester fees are reminded that the payment was due two days ago. Please clear your dues immediately to avoid penalties.",
            Category::Urgent,
            Priority::Critical,
            Some(-2),
            "Accounts Department",
            now,
        ),
        sample(
            "5",
            "Annual Cultural Fest - Registrations Open",
            "Registration is now open for the Annual Cultural Festival. Students can participate in various events including dance, music, drama, and literary competitions.",
            Category::Events,
            Priority::Normal,
            Some(7),
            "Cultural Committee",
            now,
        ),
    ]
}
