//! Canned conversations.

use std::time::Duration;

use coursepilot_model::{Message, ToolInvocation, ToolState, TransportEvent};
use serde_json::{Value, json};

use crate::ScriptedTransport;

/// Id of the user turn in [`course_lookup`].
pub const USER_MESSAGE_ID: &str = "msg:user";
/// Id of the assistant turn in [`course_lookup`].
pub const ASSISTANT_MESSAGE_ID: &str = "msg:assistant";
/// Call id of the course lookup in [`course_lookup`].
pub const COURSE_CALL_ID: &str = "call:course";
/// Tool name of the course lookup.
pub const COURSE_INFO_TOOL: &str = "get_course_info";

/// A user asking about `course`, and the assistant looking it up.
///
/// The assistant streams the call arguments, dispatches the call, and
/// resolves it with `result` nine seconds later, long enough for two
/// progress checkpoints of the standard schedule.
pub fn course_lookup(course: &str, result: Value) -> ScriptedTransport {
    let mut partial = ToolInvocation::call(COURSE_CALL_ID, COURSE_INFO_TOOL);
    partial.state = ToolState::PartialCall;
    let call = ToolInvocation::call(COURSE_CALL_ID, COURSE_INFO_TOOL)
        .with_args(json!({ "course": course }));
    let resolved = call.clone().with_result(result);

    let mut transport = ScriptedTransport::default();
    transport.add_step(TransportEvent::Upsert(Message::user(
        USER_MESSAGE_ID,
        format!("Who should I take for {course}?"),
    )));
    transport.add_step(TransportEvent::Loading(true));
    transport.add_delayed_step(
        Duration::from_millis(800),
        TransportEvent::Upsert(
            Message::assistant(ASSISTANT_MESSAGE_ID).with_tool_invocation(partial),
        ),
    );
    transport.add_delayed_step(
        Duration::from_millis(200),
        TransportEvent::Upsert(
            Message::assistant(ASSISTANT_MESSAGE_ID).with_tool_invocation(call),
        ),
    );
    transport.add_delayed_step(
        Duration::from_secs(9),
        TransportEvent::Upsert(
            Message::assistant(ASSISTANT_MESSAGE_ID)
                .with_content(format!("Here is what I found for {course}."))
                .with_tool_invocation(resolved),
        ),
    );
    transport.add_step(TransportEvent::Loading(false));
    transport
}

/// A realistic course lookup result with two offerings and two
/// instructors.
pub fn sample_course_info() -> Value {
    json!({
        "course_info": [
            {
                "Academic Year": "2023-24",
                "Term": "Fall",
                "Subject": "CS",
                "Course No.": "3114",
                "Course Title": "Data Structures and Algorithms",
                "Instructor": "Jane Roe",
                "GPA": 3.12,
                "A (%)": 38.2, "A- (%)": 12.1, "B+ (%)": 9.4, "B (%)": 10.3,
                "B- (%)": 6.0, "C+ (%)": 5.1, "C (%)": 6.8, "C- (%)": 2.9,
                "D+ (%)": 1.7, "D (%)": 2.3, "D- (%)": 0.9, "F (%)": 4.3,
                "Withdraws": 11,
                "Graded Enrollment": 233,
                "CRN": "83412",
                "Credits": 3
            },
            {
                "Academic Year": "2023-24",
                "Term": "Spring",
                "Subject": "CS",
                "Course No.": "3114",
                "Course Title": "Data Structures and Algorithms",
                "Instructor": "Sam Lee",
                "GPA": "2.87",
                "A (%)": 25.0, "A- (%)": 10.0, "B+ (%)": 10.0, "B (%)": 15.0,
                "B- (%)": 8.0, "C+ (%)": 7.0, "C (%)": 10.0, "C- (%)": 4.0,
                "D+ (%)": 3.0, "D (%)": 3.0, "D- (%)": 1.0, "F (%)": 4.0,
                "Withdraws": 17,
                "Graded Enrollment": 198,
                "CRN": "13877",
                "Credits": 3
            }
        ],
        "professor_info": [
            {
                "name": "Jane Roe",
                "department": "Computer Science",
                "rating": 4.4,
                "difficulty": 3.6,
                "num_ratings": 87,
                "would_take_again": 81.0
            },
            {
                "name": "Sam Lee",
                "department": "Computer Science",
                "rating": 3.1,
                "difficulty": 4.2,
                "num_ratings": 40
            }
        ]
    })
}
