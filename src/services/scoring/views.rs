//! 学生作业清单与班级成绩表
//!
//! 两者都是按需计算的派生视图，不写回存储。只包含有效作业，
//! 科目按学生所在班级筛选。

use std::collections::HashMap;

use super::ScoringService;
use crate::errors::Result;
use crate::models::assignments::requests::AssignmentFilter;
use crate::models::students::responses::{
    ScoreboardCell, ScoreboardColumn, ScoreboardRow, StudentAssignmentLine,
    StudentAssignmentsResponse, SubjectScoreboard,
};
use crate::models::subjects::entities::Subject;
use crate::models::submissions::{entities::Submission, requests::SubmissionFilter};

fn percentage(earned: f64, max: f64) -> f64 {
    if max > 0.0 {
        (earned / max * 1000.0).round() / 10.0
    } else {
        0.0
    }
}

impl ScoringService {
    async fn class_subjects(&self, class_name: &str) -> Result<Vec<Subject>> {
        Ok(self
            .storage
            .list_subjects()
            .await?
            .into_iter()
            .filter(|s| s.class_name == class_name)
            .collect())
    }

    /// 学生本班科目下的全部有效作业，附带提交状态
    pub async fn student_assignments(&self, student_id: i64) -> Result<StudentAssignmentsResponse> {
        let student = self.require_student(student_id).await?;
        let submissions = self
            .storage
            .list_submissions(SubmissionFilter::by_student(student_id))
            .await?;
        let total_score = submissions.iter().map(|s| s.score).sum();
        let by_assignment: HashMap<i64, &Submission> =
            submissions.iter().map(|s| (s.assignment_id, s)).collect();

        let mut lines = Vec::new();
        for subject in self.class_subjects(&student.class_name).await? {
            let assignments = self
                .storage
                .list_assignments(AssignmentFilter::active_in_subject(subject.id))
                .await?;
            for assignment in assignments {
                let submission = by_assignment.get(&assignment.id);
                lines.push(StudentAssignmentLine {
                    assignment_id: assignment.id,
                    subject_id: subject.id,
                    subject_name: subject.name.clone(),
                    title: assignment.title,
                    due_date: assignment.due_date,
                    max_score: assignment.score,
                    is_submitted: submission.is_some(),
                    score: submission.map(|s| s.score).unwrap_or(0.0),
                    submitted_at: submission.map(|s| s.submitted_at),
                });
            }
        }

        Ok(StudentAssignmentsResponse {
            student_id,
            student_code: student.student_code,
            class_name: student.class_name,
            total_score,
            pending_count: lines.iter().filter(|l| !l.is_submitted).count(),
            assignments: lines,
        })
    }

    /// 学生所在班级每个科目的成绩表
    ///
    /// 列为科目下的有效作业（按创建顺序），行为同班全部学生（按学号）。
    pub async fn class_scoreboard(&self, student_id: i64) -> Result<Vec<SubjectScoreboard>> {
        let student = self.require_student(student_id).await?;
        let classmates: Vec<_> = self
            .storage
            .list_students()
            .await?
            .into_iter()
            .filter(|s| s.class_name == student.class_name)
            .collect();

        let mut boards = Vec::new();
        for subject in self.class_subjects(&student.class_name).await? {
            let assignments = self
                .storage
                .list_assignments(AssignmentFilter::active_in_subject(subject.id))
                .await?;
            let submissions = self
                .storage
                .list_submissions(SubmissionFilter::by_subject(subject.id))
                .await?;
            let by_key: HashMap<(i64, i64), &Submission> = submissions
                .iter()
                .map(|s| ((s.student_id, s.assignment_id), s))
                .collect();

            let max_total_score: f64 = assignments.iter().map(|a| a.score).sum();
            let rows = classmates
                .iter()
                .map(|classmate| {
                    let cells: Vec<ScoreboardCell> = assignments
                        .iter()
                        .map(|assignment| {
                            let submission = by_key.get(&(classmate.id, assignment.id));
                            ScoreboardCell {
                                assignment_id: assignment.id,
                                score: submission.map(|s| s.score).unwrap_or(0.0),
                                is_submitted: submission.is_some(),
                                submitted_at: submission.map(|s| s.submitted_at),
                            }
                        })
                        .collect();
                    let total_score = cells.iter().map(|c| c.score).sum();
                    ScoreboardRow {
                        student_id: classmate.id,
                        student_code: classmate.student_code.clone(),
                        name: classmate.name.clone(),
                        cells,
                        total_score,
                        max_total_score,
                        percentage: percentage(total_score, max_total_score),
                    }
                })
                .collect();

            boards.push(SubjectScoreboard {
                subject_id: subject.id,
                subject_name: subject.name,
                class_name: subject.class_name,
                assignments: assignments
                    .into_iter()
                    .map(|a| ScoreboardColumn {
                        assignment_id: a.id,
                        title: a.title,
                        max_score: a.score,
                    })
                    .collect(),
                students: rows,
            });
        }

        Ok(boards)
    }
}

#[cfg(test)]
mod tests {
    use super::percentage;
    use crate::models::students::requests::CreateStudentRequest;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::services::scoring::tests::{TestBed, add_assignment};

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(33.0, 100.0), 33.0);
        assert_eq!(percentage(1.0, 3.0), 33.3);
        assert_eq!(percentage(5.0, 0.0), 0.0);
    }

    #[tokio::test]
    async fn test_student_assignments_include_pending() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        let hw1 = add_assignment(&bed, subject.id, "hw1").await;
        let hw2 = add_assignment(&bed, subject.id, "hw2").await;
        let dropped = add_assignment(&bed, subject.id, "hw3").await;
        bed.storage.deactivate_assignment(dropped.id).await.unwrap();
        bed.scoring.recompute_subject(subject.id).await.unwrap();
        bed.submit(subject.id, hw1.id, "S1", 40.0).await;

        let student = bed.student("S1").await;
        let view = bed.scoring.student_assignments(student.id).await.unwrap();

        assert_eq!(view.assignments.len(), 2);
        assert_eq!(view.pending_count, 1);
        assert_eq!(view.total_score, 40.0);
        assert!(view.assignments[0].is_submitted);
        assert_eq!(view.assignments[0].score, 40.0);
        assert_eq!(view.assignments[1].assignment_id, hw2.id);
        assert!(!view.assignments[1].is_submitted);
        assert_eq!(view.assignments[1].score, 0.0);
        assert_eq!(view.assignments[1].max_score, 50.0);
        assert!(view.assignments[1].submitted_at.is_none());
    }

    #[tokio::test]
    async fn test_class_scoreboard_lists_every_classmate() {
        let bed = TestBed::new().await;
        let subject = bed.subject(100.0).await;
        let other_class = bed
            .storage
            .create_subject(CreateSubjectRequest {
                name: "Chemistry".to_string(),
                class_name: "8B".to_string(),
                max_score: None,
            })
            .await
            .unwrap();
        let hw1 = add_assignment(&bed, subject.id, "hw1").await;
        add_assignment(&bed, subject.id, "hw2").await;
        bed.scoring.recompute_subject(subject.id).await.unwrap();
        bed.submit(subject.id, hw1.id, "S1", 50.0).await;
        bed.submit(subject.id, hw1.id, "S2", 20.0).await;
        bed.student("S3").await;
        bed.storage
            .create_student(CreateStudentRequest {
                student_code: "X1".to_string(),
                name: "Other".to_string(),
                class_name: "8B".to_string(),
            })
            .await
            .unwrap();

        let s1 = bed.student("S1").await;
        let boards = bed.scoring.class_scoreboard(s1.id).await.unwrap();

        assert_eq!(boards.len(), 1);
        assert_ne!(boards[0].subject_id, other_class.id);
        assert_eq!(boards[0].assignments.len(), 2);
        let codes: Vec<_> = boards[0]
            .students
            .iter()
            .map(|r| r.student_code.as_str())
            .collect();
        assert_eq!(codes, vec!["S1", "S2", "S3"]);

        let s2 = &boards[0].students[1];
        assert_eq!(s2.total_score, 20.0);
        assert_eq!(s2.max_total_score, 100.0);
        assert_eq!(s2.percentage, 20.0);
        assert!(s2.cells[0].is_submitted);
        assert!(!s2.cells[1].is_submitted);
        assert!(boards[0].students[2].cells.iter().all(|c| !c.is_submitted));
    }

    #[tokio::test]
    async fn test_views_require_student() {
        let bed = TestBed::new().await;
        let err = bed.scoring.class_scoreboard(404).await.unwrap_err();
        assert_eq!(err.code(), "E007");
        let err = bed.scoring.student_assignments(404).await.unwrap_err();
        assert_eq!(err.code(), "E007");
    }
}
