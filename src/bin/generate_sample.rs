use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Student {
    school: &'static str,
    area: &'static str,
    gender: &'static str,
    category: &'static str,
    grade: i64,
    dropout: &'static str,
    score: f64,
    attendance: f64,
    age: i64,
}

fn generate_students(n: usize, rng: &mut SimpleRng) -> Vec<Student> {
    let schools = ["Government", "Private", "Aided"];
    let areas = ["Urban", "Rural"];
    let genders = ["Male", "Female"];
    let categories = ["General", "OBC", "SC", "ST"];

    (0..n)
        .map(|_| {
            let school = rng.pick(&schools);
            let area = rng.pick(&areas);
            let gender = rng.pick(&genders);
            let category = rng.pick(&categories);
            let grade = 6 + (rng.next_u64() % 5) as i64;

            let mut risk = 0.18;
            if school == "Government" {
                risk += 0.08;
            }
            if area == "Rural" {
                risk += 0.12;
            }
            if category == "SC" || category == "ST" {
                risk += 0.06;
            }
            risk += (grade - 6) as f64 * 0.03;

            let score = (risk + rng.gauss(0.0, 0.18)).clamp(0.0, 1.0);
            let dropout = if score > 0.55 { "yes" } else { "no" };
            let attendance = (95.0 - 45.0 * score + rng.gauss(0.0, 4.0)).clamp(35.0, 100.0);
            let age = grade + 5 + (rng.next_u64() % 3) as i64;

            Student {
                school,
                area,
                gender,
                category,
                grade,
                dropout,
                score,
                attendance,
                age,
            }
        })
        .collect()
}

/// Raw headers are deliberately un-normalized ("SocialCategory",
/// "Dropout Score") so a load exercises the column canonicalization.
const RAW_HEADERS: [&str; 9] = [
    "School",
    "Area",
    "Gender",
    "SocialCategory",
    "Grade",
    "Dropout",
    "Dropout Score",
    "Attendance",
    "Age",
];

fn write_csv(students: &[Student], path: &str) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer
        .write_record(RAW_HEADERS)
        .expect("Failed to write CSV header");
    for s in students {
        writer
            .write_record([
                s.school.to_string(),
                s.area.to_string(),
                s.gender.to_string(),
                s.category.to_string(),
                s.grade.to_string(),
                s.dropout.to_string(),
                format!("{:.3}", s.score),
                format!("{:.1}", s.attendance),
                s.age.to_string(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(students: &[Student], path: &str) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("School", DataType::Utf8, false),
        Field::new("Area", DataType::Utf8, false),
        Field::new("Gender", DataType::Utf8, false),
        Field::new("SocialCategory", DataType::Utf8, false),
        Field::new("Grade", DataType::Int64, false),
        Field::new("Dropout", DataType::Utf8, false),
        Field::new("Dropout Score", DataType::Float64, false),
        Field::new("Attendance", DataType::Float64, false),
        Field::new("Age", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(
                students.iter().map(|s| s.school),
            )),
            Arc::new(StringArray::from_iter_values(
                students.iter().map(|s| s.area),
            )),
            Arc::new(StringArray::from_iter_values(
                students.iter().map(|s| s.gender),
            )),
            Arc::new(StringArray::from_iter_values(
                students.iter().map(|s| s.category),
            )),
            Arc::new(Int64Array::from_iter_values(
                students.iter().map(|s| s.grade),
            )),
            Arc::new(StringArray::from_iter_values(
                students.iter().map(|s| s.dropout),
            )),
            Arc::new(Float64Array::from_iter_values(
                students.iter().map(|s| s.score),
            )),
            Arc::new(Float64Array::from_iter_values(
                students.iter().map(|s| s.attendance),
            )),
            Arc::new(Int64Array::from_iter_values(students.iter().map(|s| s.age))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let students = generate_students(400, &mut rng);
    let dropouts = students.iter().filter(|s| s.dropout == "yes").count();

    write_csv(&students, "student_dropout_dataset.csv");
    write_parquet(&students, "student_dropout_dataset.parquet");

    println!(
        "Wrote {} students ({dropouts} dropouts) to student_dropout_dataset.{{csv,parquet}}",
        students.len()
    );
}
