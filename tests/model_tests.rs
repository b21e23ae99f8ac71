use chrono::NaiveDate;
use taskdesk::error::TaskError;
use taskdesk::models::{parse_status_glyph, status_glyph, Deadline, Priority, Task};

fn date(y: i32, m: u32, d: u32) -> Deadline {
    Deadline::On(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

#[test]
fn test_priority_rank_order() {
    let ranks: Vec<u8> = Priority::ALL.iter().map(|p| p.rank()).collect();
    assert_eq!(ranks, vec![0, 1, 2, 3]);
    assert!(Priority::High.rank() < Priority::None.rank());
}

#[test]
fn test_priority_parse() {
    assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
    assert_eq!("MEDIUM".parse::<Priority>().unwrap(), Priority::Medium);
    assert_eq!(" Low ".parse::<Priority>().unwrap(), Priority::Low);
    assert_eq!("".parse::<Priority>().unwrap(), Priority::None);
    assert!(matches!("urgent".parse::<Priority>(), Err(TaskError::InvalidPriority(_))));
}

#[test]
fn test_deadline_parse_and_render() {
    assert_eq!("".parse::<Deadline>().unwrap(), Deadline::Unset);
    assert_eq!("none".parse::<Deadline>().unwrap(), Deadline::Unset);
    assert_eq!("2024-05-01".parse::<Deadline>().unwrap(), date(2024, 5, 1));
    assert_eq!(date(2024, 1, 5).to_string(), "2024-01-05");
    assert_eq!(Deadline::Unset.to_string(), "none");
    assert!(matches!("2024-13-01".parse::<Deadline>(), Err(TaskError::InvalidDeadline(_))));
    assert!("tomorrow".parse::<Deadline>().is_err());
}

#[test]
fn test_none_deadline_sorts_after_dates() {
    assert!(date(2024, 1, 15) < date(2024, 5, 1));
    assert!(date(9999, 12, 31) < Deadline::Unset);
    // Same order as the canonical text.
    assert!(date(9999, 12, 31).to_string() < Deadline::Unset.to_string());
}

#[test]
fn test_task_defaults() {
    let t = Task::new("Buy milk", "", Deadline::Unset, Priority::None).unwrap();
    assert_eq!(t.description, "Buy milk");
    assert_eq!(t.category, "none");
    assert_eq!(t.deadline, Deadline::Unset);
    assert_eq!(t.priority, Priority::None);
    assert!(!t.status);
}

#[test]
fn test_task_description_limits() {
    assert!(matches!(Task::new("   ", "", Deadline::Unset, Priority::None), Err(TaskError::EmptyDescription)));
    let long = "x".repeat(31);
    assert!(matches!(
        Task::new(&long, "", Deadline::Unset, Priority::None),
        Err(TaskError::DescriptionTooLong { len: 31, max: 30 })
    ));
    assert!(Task::new(&"ä".repeat(30), "", Deadline::Unset, Priority::None).is_ok());
}

#[test]
fn test_display_line() {
    let mut t = Task::new("Write report", "work", date(2024, 5, 1), Priority::High).unwrap();
    assert_eq!(
        t.to_string(),
        "Description: Write report, Category: work, Deadline: 2024-05-01, Priority: high, Status: [ ]"
    );
    t.status = true;
    assert!(t.to_string().ends_with("Status: [✔]"));
}

#[test]
fn test_display_truncates_category() {
    let t = Task::new("Plan", "abcdefghijklmnopqrstuvwxyz", Deadline::Unset, Priority::Low).unwrap();
    assert!(t.to_string().contains("Category: abcdefghijklmnopqrst,"));
    assert_eq!(t.category.len(), 26);
}

#[test]
fn test_status_glyphs() {
    assert_eq!(status_glyph(true), "[✔]");
    assert_eq!(status_glyph(false), "[ ]");
    assert!(parse_status_glyph("[✔]").unwrap());
    assert!(!parse_status_glyph("[ ]").unwrap());
    assert!(matches!(parse_status_glyph("[x]"), Err(TaskError::InvalidStatus(_))));
}

#[test]
fn test_equality_ignores_id() {
    let mut a = Task::new("Buy milk", "", Deadline::Unset, Priority::Low).unwrap();
    let mut b = a.clone();
    a.id = 1;
    b.id = 7;
    assert_eq!(a, b);

    b.status = true;
    assert_ne!(a, b);
}

#[test]
fn test_strict_file_tokens() {
    assert_eq!(Priority::from_name("HIGH").unwrap(), Priority::High);
    assert_eq!(Priority::from_name("low").unwrap(), Priority::Low);
    assert!(matches!(Priority::from_name(""), Err(TaskError::InvalidPriority(_))));
    assert!(matches!(Priority::from_name("NONE "), Err(TaskError::InvalidPriority(_))));

    assert_eq!(Deadline::from_canonical("none").unwrap(), Deadline::Unset);
    assert_eq!(Deadline::from_canonical("2024-05-01").unwrap(), date(2024, 5, 1));
    assert!(matches!(Deadline::from_canonical(""), Err(TaskError::InvalidDeadline(_))));
    assert!(matches!(Deadline::from_canonical("None"), Err(TaskError::InvalidDeadline(_))));
}
