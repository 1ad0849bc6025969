//! Demo data the store starts with.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{
    assignment_item::AssignmentItem,
    attendance_record::{AttendanceRecord, AttendanceStatus},
    code_problem::{CodeProblem, CodeStatus, CodeSubmission, Difficulty, Language},
    course_info::CourseInfo,
    supplementary_material::{MaterialKind, SupplementaryMaterial},
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    day(y, m, d)
        .and_hms_opt(h, min, s)
        .map(|t| t.and_utc())
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn course(
    id: u32,
    title: &str,
    code: &str,
    instructor_id: u32,
    instructor: &str,
    description: &str,
    thumbnail: &str,
    enrolled_students: &[u32],
    active: bool,
    credits: u32,
    schedule: &str,
    location: &str,
) -> CourseInfo {
    CourseInfo {
        id,
        title: title.into(),
        code: code.into(),
        instructor_id,
        instructor: instructor.into(),
        description: description.into(),
        thumbnail: format!("https://images.unsplash.com/{thumbnail}?auto=format&fit=crop&w=500&h=300"),
        enrolled_students: enrolled_students.to_vec(),
        active,
        credits,
        schedule: Some(schedule.into()),
        location: Some(location.into()),
        syllabus: Some(format!("https://example.com/{}-syllabus", code.to_lowercase())),
    }
}

pub fn courses() -> Vec<CourseInfo> {
    vec![
        course(
            1,
            "Introduction to Computer Science",
            "CS101",
            3,
            "Dr. Robert Johnson",
            "An introductory course covering the basics of computer science including algorithms, data structures, and programming fundamentals.",
            "photo-1488590528505-98d2b5aba04b",
            &[1, 2],
            true,
            3,
            "Mon, Wed 10:00 - 11:30 AM",
            "Science Building, Room 302",
        ),
        course(
            2,
            "Data Structures and Algorithms",
            "CS201",
            3,
            "Dr. Robert Johnson",
            "A comprehensive study of data structures and algorithms with practical applications in problem-solving.",
            "photo-1509316975850-ff9c5deb0cd9",
            &[1],
            true,
            4,
            "Tue, Thu 1:00 - 3:00 PM",
            "Computer Science Building, Room 105",
        ),
        course(
            3,
            "Database Management Systems",
            "CS301",
            3,
            "Dr. Robert Johnson",
            "Learn the fundamentals of database design, implementation, and management with hands-on SQL practice.",
            "photo-1526374965328-7f61d4dc18c5",
            &[2],
            false,
            3,
            "Mon, Wed, Fri 2:00 - 3:00 PM",
            "Technology Center, Room 450",
        ),
        course(
            4,
            "Artificial Intelligence Fundamentals",
            "CS401",
            5,
            "Dr. Sarah Miller",
            "An introduction to artificial intelligence concepts, algorithms, and applications.",
            "photo-1485827404703-89b55fcc595e",
            &[1, 2],
            true,
            4,
            "Tue, Thu 10:00 AM - 12:00 PM",
            "AI Lab, Science Building",
        ),
        course(
            5,
            "Web Development",
            "CS350",
            6,
            "Prof. Michael Chen",
            "Comprehensive course on full-stack web development covering HTML, CSS, JavaScript, and modern frameworks.",
            "photo-1498050108023-c5249f4df085",
            &[1],
            true,
            3,
            "Mon, Wed 3:30 - 5:00 PM",
            "Computer Lab 2, Room 203",
        ),
    ]
}

pub fn assignments() -> Vec<AssignmentItem> {
    let assignment = |id, course_id, title: &str, description: &str, due, points| AssignmentItem {
        id,
        course_id,
        title: title.into(),
        description: description.into(),
        due_date: due,
        points,
        submissions: vec![],
    };

    vec![
        assignment(
            1,
            1,
            "Basic Programming Concepts",
            "Implement basic algorithms in a programming language of your choice.",
            at(2025, 4, 30, 23, 59, 59),
            100,
        ),
        assignment(
            2,
            1,
            "Control Structures",
            "Create programs demonstrating various control structures including loops and conditionals.",
            at(2025, 5, 15, 23, 59, 59),
            150,
        ),
        assignment(
            3,
            2,
            "Implementing Linked Lists",
            "Implement singly and doubly linked lists with essential operations.",
            at(2025, 4, 25, 23, 59, 59),
            200,
        ),
    ]
}

pub fn materials() -> Vec<SupplementaryMaterial> {
    let material = |id, course_id, title: &str, kind, photo: &str, date, size: &str| {
        SupplementaryMaterial {
            id,
            course_id,
            title: title.into(),
            kind,
            url: format!("https://images.unsplash.com/{photo}?auto=format&fit=crop&w=500&h=300"),
            upload_date: date,
            size: Some(size.into()),
        }
    };

    vec![
        material(
            1,
            1,
            "Introduction to Algorithms",
            MaterialKind::Pdf,
            "photo-1460925895917-afdab827c52f",
            day(2025, 4, 1),
            "2.4 MB",
        ),
        material(
            2,
            1,
            "Programming Basics Video Lecture",
            MaterialKind::Video,
            "photo-1531297484001-80022131f5a1",
            day(2025, 4, 2),
            "45 MB",
        ),
        material(
            3,
            2,
            "Data Structures Overview",
            MaterialKind::Pdf,
            "photo-1473091534298-04dcbce3278c",
            day(2025, 4, 3),
            "1.8 MB",
        ),
    ]
}

pub fn attendance() -> Vec<AttendanceRecord> {
    use AttendanceStatus::*;

    [
        (1, 1, 1, day(2025, 4, 1), Present),
        (2, 1, 1, day(2025, 4, 3), Present),
        (3, 1, 1, day(2025, 4, 5), Absent),
        (4, 1, 2, day(2025, 4, 1), Present),
        (5, 1, 2, day(2025, 4, 3), Late),
        (6, 2, 1, day(2025, 4, 2), Present),
        (7, 2, 1, day(2025, 4, 4), Present),
        (8, 4, 1, day(2025, 4, 3), Late),
        (9, 4, 2, day(2025, 4, 3), Present),
    ]
    .into_iter()
    .map(|(id, course_id, student_id, date, status)| AttendanceRecord {
        id,
        course_id,
        student_id,
        date,
        status,
    })
    .collect()
}

pub fn code_problems() -> Vec<CodeProblem> {
    let problem = |id, title: &str, description: &str, difficulty, tags: &[&str]| CodeProblem {
        id,
        title: title.into(),
        description: description.into(),
        difficulty,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    };

    vec![
        problem(
            1,
            "Two Sum",
            "Given an array of integers nums and an integer target, return indices of the two numbers such that they add up to target.",
            Difficulty::Easy,
            &["arrays", "hash table"],
        ),
        problem(
            2,
            "Reverse Linked List",
            "Reverse a singly linked list.",
            Difficulty::Medium,
            &["linked list", "recursion"],
        ),
        problem(
            3,
            "Merge K Sorted Lists",
            "Merge k sorted linked lists and return it as one sorted list.",
            Difficulty::Hard,
            &["linked list", "divide and conquer", "heap"],
        ),
    ]
}

pub fn code_submissions() -> Vec<CodeSubmission> {
    vec![
        CodeSubmission {
            id: 1,
            student_id: 1,
            problem_id: 1,
            language: Language::Python,
            code: "def two_sum(nums, target):\n    seen = {}\n    for i, num in enumerate(nums):\n        if target - num in seen:\n            return [seen[target - num], i]\n        seen[num] = i\n    return []".into(),
            status: CodeStatus::Correct,
            submission_date: at(2025, 4, 2, 0, 0, 0),
        },
        CodeSubmission {
            id: 2,
            student_id: 1,
            problem_id: 2,
            language: Language::Java,
            code: "public ListNode reverseList(ListNode head) {\n    ListNode prev = null;\n    while (head != null) {\n        ListNode next = head.next;\n        head.next = prev;\n        prev = head;\n        head = next;\n    }\n    return prev;\n}".into(),
            status: CodeStatus::Correct,
            submission_date: at(2025, 4, 5, 0, 0, 0),
        },
        CodeSubmission {
            id: 3,
            student_id: 2,
            problem_id: 1,
            language: Language::Cpp,
            code: "vector<int> twoSum(vector<int>& nums, int target) {\n    unordered_map<int, int> seen;\n    for (int i = 0; i < nums.size(); i++) {\n        if (seen.count(target - nums[i])) return {seen[target - nums[i]], i};\n        seen[nums[i]] = i;\n    }\n    return {};\n}".into(),
            status: CodeStatus::Correct,
            submission_date: at(2025, 4, 3, 0, 0, 0),
        },
    ]
}
