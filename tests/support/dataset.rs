use std::path::{Path, PathBuf};

pub const HEADER: &str = "Name,Gender,Country,State,City,Parent Occupation,Earning Class,\
Course Name,Material Name,Material Level,Level of Student,Level of Course,Study Hours,\
Attendance,Assessment Score";

/// A student row; `score` is derived from the other fields unless overridden.
pub struct Row {
    pub gender: &'static str,
    pub city: (&'static str, &'static str, &'static str),
    pub occupation: &'static str,
    pub earning: &'static str,
    pub course: &'static str,
    pub material: &'static str,
    pub material_level: u32,
    pub student_level: u32,
    pub course_level: u32,
    pub study_hours: f64,
    pub attendance: f64,
    pub score: f64,
}

impl Row {
    pub fn to_csv(&self, idx: usize) -> String {
        let (country, state, city) = self.city;
        format!(
            "Student {idx},{},{country},{state},{city},{},{},{},{},{},{},{},{:.1},{:.1},{:.1}",
            self.gender,
            self.occupation,
            self.earning,
            self.course,
            self.material,
            self.material_level,
            self.student_level,
            self.course_level,
            self.study_hours,
            self.attendance,
            self.score
        )
    }
}

/// Deterministic rows whose score depends on level, hours, attendance, and
/// earning class.
pub fn learnable_rows(count: usize) -> Vec<Row> {
    const CITIES: [(&str, &str, &str); 4] = [
        ("India", "Kerala", "Kochi"),
        ("India", "Karnataka", "Bengaluru"),
        ("Nepal", "Bagmati", "Kathmandu"),
        ("Kenya", "Nairobi County", "Nairobi"),
    ];
    const OCCUPATIONS: [&str; 3] = ["Doctor", "Teacher", "Farmer"];
    const EARNING: [(&str, f64); 3] = [("High", 6.0), ("Middle", 3.0), ("Low", 0.0)];
    const COURSES: [&str; 2] = ["Math", "Science"];
    const MATERIALS: [&str; 3] = ["Algebra", "Optics", "Geometry"];

    (0..count)
        .map(|i| {
            let student_level = 1 + (i * 7 % 12) as u32;
            let study_hours = 1.0 + (i * 3 % 9) as f64 * 0.5;
            let attendance = 55.0 + (i * 11 % 45) as f64;
            let (earning, bonus) = EARNING[i % 3];
            let jitter = ((i * 13) % 5) as f64 - 2.0;
            let score = 20.0
                + 2.5 * student_level as f64
                + 4.0 * study_hours
                + 0.3 * attendance
                + bonus
                + jitter;
            Row {
                gender: if i % 2 == 0 { "Male" } else { "Female" },
                city: CITIES[i % 4],
                occupation: OCCUPATIONS[i % 3],
                earning,
                course: COURSES[i / 3 % 2],
                material: MATERIALS[i % 3],
                material_level: 1 + (i % 12) as u32,
                student_level,
                course_level: 1 + (i * 5 % 12) as u32,
                study_hours,
                attendance,
                score,
            }
        })
        .collect()
}

pub fn to_csv(rows: &[Row]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for (idx, row) in rows.iter().enumerate() {
        out.push_str(&row.to_csv(idx));
        out.push('\n');
    }
    out
}

pub fn write_csv(dir: &Path, name: &str, rows: &[Row]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, to_csv(rows)).expect("write dataset csv");
    path
}

/// Form input strings for a row, in header order without Name and score.
pub fn form_inputs(row: &Row) -> Vec<String> {
    let (country, state, city) = row.city;
    vec![
        row.gender.to_string(),
        country.to_string(),
        state.to_string(),
        city.to_string(),
        row.occupation.to_string(),
        row.earning.to_string(),
        row.course.to_string(),
        row.material.to_string(),
        row.material_level.to_string(),
        row.student_level.to_string(),
        row.course_level.to_string(),
        format!("{:.1}", row.study_hours),
        format!("{:.1}", row.attendance),
    ]
}
