//! Deterministic synthetic student rows for unit tests.

use std::path::Path;

use super::{Dataset, parse_dataset};

pub(crate) const HEADER: [&str; 15] = [
    "Name",
    "Gender",
    "Country",
    "State",
    "City",
    "Parent Occupation",
    "Earning Class",
    "Course Name",
    "Material Name",
    "Material Level",
    "Level of Student",
    "Level of Course",
    "Study Hours",
    "Attendance",
    "Assessment Score",
];

/// CSV text with `rows` students whose score is a simple function of their
/// level, study hours, and gender.
pub(crate) fn sample_csv(rows: usize) -> String {
    const GENDERS: [&str; 2] = ["Male", "Female"];
    const PLACES: [(&str, &str, &str); 3] = [
        ("India", "Kerala", "Kochi"),
        ("Nepal", "Bagmati", "Kathmandu"),
        ("Kenya", "Nairobi County", "Nairobi"),
    ];
    const OCCUPATIONS: [&str; 4] = ["Doctor", "Teacher", "Farmer", "Engineer"];
    const EARNING: [&str; 3] = ["High", "Middle", "Low"];
    const COURSES: [&str; 2] = ["Math", "Physics"];
    const MATERIALS: [&str; 3] = ["Algebra", "Mechanics", "Geometry"];

    let mut out = HEADER.join(",");
    out.push('\n');
    for i in 0..rows {
        let (country, state, city) = PLACES[i % 3];
        let student_level = 1 + (i * 5) % 12;
        let hours = 1.5 + (i % 6) as f64;
        let female_bonus = if i % 2 == 1 { 5.0 } else { 0.0 };
        let score = 30.0 + 3.0 * student_level as f64 + 4.0 * hours + female_bonus;
        let row = [
            format!("Student {i}"),
            GENDERS[i % 2].to_string(),
            country.to_string(),
            state.to_string(),
            city.to_string(),
            OCCUPATIONS[i % 4].to_string(),
            EARNING[i % 3].to_string(),
            COURSES[(i / 2) % 2].to_string(),
            MATERIALS[i % 3].to_string(),
            (1 + i % 12).to_string(),
            student_level.to_string(),
            (1 + (i * 7) % 12).to_string(),
            format!("{hours:.1}"),
            (60 + (i * 7) % 40).to_string(),
            format!("{score:.1}"),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Parsed [`sample_csv`].
pub(crate) fn sample_dataset(rows: usize) -> Dataset {
    parse_dataset(sample_csv(rows).as_bytes(), Path::new("fixture.csv"))
        .expect("fixture csv parses")
}
