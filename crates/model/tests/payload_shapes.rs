use coursepilot_model::{
    CombinedInfo, CourseInfoPayload, CourseRecord, PayloadError,
};
use serde_json::{Value, json};

fn course(instructor: &str, gpa: f64) -> Value {
    json!({
        "Academic Year": "2024",
        "Term": "Spring",
        "Subject": "CS",
        "Course No.": "2506",
        "Course Title": "Intro to Computer Organization",
        "Instructor": instructor,
        "GPA": gpa,
        "A (%)": 40.0,
        "A- (%)": 20.0,
        "B+ (%)": 10.0,
        "B (%)": 10.0,
        "B- (%)": 5.0,
        "C+ (%)": 5.0,
        "C (%)": 4.0,
        "C- (%)": 2.0,
        "D+ (%)": 1.0,
        "D (%)": 1.0,
        "D- (%)": 1.0,
        "F (%)": 1.0,
        "Withdraws": 3,
        "Graded Enrollment": 210,
        "CRN": 13337,
        "Credits": 3
    })
}

#[test]
fn test_bare_array_is_course_info() {
    let raw = json!([course("Jane Roe", 3.4), course("John Doe", 2.9)]);
    let payload = CourseInfoPayload::parse(&raw).unwrap();
    assert!(matches!(payload, CourseInfoPayload::Bare(ref rows) if rows.len() == 2));

    let info = payload.into_combined();
    assert_eq!(info.course_info.len(), 2);
    assert_eq!(info.course_info[1].instructor, "John Doe");
    assert!(info.professor_info.is_empty());
    assert_eq!(info.error, None);
}

#[test]
fn test_stringified_object() {
    let text = serde_json::to_string(&json!({
        "course_info": [course("Jane Roe", 3.4)],
        "professor_info": [{
            "name": "Jane Roe",
            "department": "Computer Science",
            "school": "Virginia Tech",
            "rating": 4.5,
            "difficulty": 3.1,
            "num_ratings": 87,
            "would_take_again": null
        }]
    }))
    .unwrap();
    let info = CombinedInfo::from_payload(&Value::String(text)).unwrap();
    assert_eq!(info.course_info.len(), 1);
    assert_eq!(info.professor_info[0].rating, Some(4.5));
    assert_eq!(info.professor_info[0].would_take_again, None);
}

#[test]
fn test_string_is_parsed_only_once() {
    let inner = serde_json::to_string(&json!([course("Jane Roe", 3.4)])).unwrap();
    let twice = serde_json::to_string(&Value::String(inner)).unwrap();
    let err = CombinedInfo::from_payload(&Value::String(twice)).unwrap_err();
    assert!(matches!(err, PayloadError::UnexpectedShape(_)));
}

#[test]
fn test_invalid_json() {
    let err = CombinedInfo::from_payload(&json!("{not json")).unwrap_err();
    assert!(matches!(err, PayloadError::InvalidJson(_)));
}

#[test]
fn test_wrong_shapes() {
    assert!(CombinedInfo::from_payload(&json!(42)).is_err());
    assert!(CombinedInfo::from_payload(&json!({ "course_info": 42 })).is_err());
    assert!(CombinedInfo::from_payload(&json!([1, 2, 3])).is_err());
}

#[test]
fn test_partial_object() {
    let info = CombinedInfo::from_payload(&json!({
        "course_info": [course("Jane Roe", 3.4)]
    }))
    .unwrap();
    assert_eq!(info.course_info.len(), 1);
    assert!(info.professor_info.is_empty());

    let info = CombinedInfo::from_payload(&json!(null)).unwrap();
    assert!(info.is_empty());
}

#[test]
fn test_producer_error() {
    let info = CombinedInfo::from_payload(&json!({
        "error": "No course data found",
        "course_info": [],
        "professor_info": []
    }))
    .unwrap();
    assert!(info.is_empty());
    assert_eq!(info.error.as_deref(), Some("No course data found"));
}

#[test]
fn test_record_round_trips_wire_keys() {
    let record: CourseRecord = serde_json::from_value(course("Jane Roe", 3.4)).unwrap();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["Course No."], "2506");
    assert_eq!(value["A- (%)"], 20.0);
    assert_eq!(value["Graded Enrollment"], 210);
}
