use std::collections::HashMap;

use crate::core::config::CanonicalTotals;
use crate::db::models::Exam;
use crate::db::types::{ModuleDifficulty, ModuleType};

/// Authored time-limit values above this are seconds, not minutes. Legacy
/// exams were written both ways and carry no unit tag.
const SECONDS_HEURISTIC_THRESHOLD: i64 = 300;

/// Per-module aggregate the resolver works from, one row per module.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ModuleStats {
    pub(crate) section_id: String,
    pub(crate) module_type: ModuleType,
    pub(crate) difficulty: Option<ModuleDifficulty>,
    pub(crate) time_limit: Option<i32>,
    pub(crate) question_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExamSummary {
    pub(crate) total_questions: i64,
    pub(crate) duration_minutes: i64,
    pub(crate) module_count: i64,
    pub(crate) section_count: i64,
}

/// Normalizes a raw authored time limit to minutes.
pub(crate) fn normalize_minutes(raw: i32) -> i64 {
    let raw = i64::from(raw);
    if raw > SECONDS_HEURISTIC_THRESHOLD {
        (raw + 30) / 60
    } else {
        raw
    }
}

/// Computes the summary a student actually experiences: an adaptive EASY/HARD
/// pair collapses to one module slot with the averaged question count and
/// time limit, since only one variant is ever sat and the routed variant is
/// unknown at summary time.
pub(crate) fn resolve_summary(
    exam: &Exam,
    modules: &[ModuleStats],
    section_count: i64,
    canonical: Option<&CanonicalTotals>,
) -> ExamSummary {
    let mut by_section: HashMap<&str, Vec<&ModuleStats>> = HashMap::new();
    for module in modules {
        by_section.entry(module.section_id.as_str()).or_default().push(module);
    }

    let mut total_questions = 0i64;
    let mut module_count = 0i64;
    let mut duration_minutes = 0i64;
    let mut any_module_limit = false;

    for section_modules in by_section.values() {
        let mut adaptive: Vec<&ModuleStats> = Vec::new();

        for module in section_modules {
            if matches!(module.module_type, ModuleType::Adaptive) && module.difficulty.is_some() {
                adaptive.push(module);
                continue;
            }

            // Routing and plain modules (and malformed adaptive rows without a
            // difficulty) are always taken.
            module_count += 1;
            total_questions += module.question_count;
            if let Some(limit) = module.time_limit {
                any_module_limit = true;
                duration_minutes += normalize_minutes(limit);
            }
        }

        if adaptive.is_empty() {
            continue;
        }

        module_count += 1;
        total_questions +=
            rounded_average(adaptive.iter().map(|module| module.question_count));

        let limits: Vec<i64> = adaptive
            .iter()
            .filter_map(|module| module.time_limit)
            .map(normalize_minutes)
            .collect();
        if !limits.is_empty() {
            any_module_limit = true;
            duration_minutes += rounded_average(limits.iter().copied());
        }
    }

    if !any_module_limit {
        duration_minutes = exam.time_limit.map(normalize_minutes).unwrap_or(0);
    }

    if let Some(canonical) = canonical {
        if total_questions > canonical.total_questions {
            total_questions = canonical.total_questions;
            module_count = canonical.module_count;
        }
    }

    ExamSummary { total_questions, duration_minutes, module_count, section_count }
}

fn rounded_average(values: impl Iterator<Item = i64>) -> i64 {
    let values: Vec<i64> = values.collect();
    if values.is_empty() {
        return 0;
    }
    let sum: i64 = values.iter().sum();
    (sum as f64 / values.len() as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;

    fn exam(time_limit: Option<i32>) -> Exam {
        let now = primitive_now_utc();
        Exam {
            id: "exam-1".to_string(),
            title: "Practice Test 1".to_string(),
            program: "subject".to_string(),
            time_limit,
            is_practice: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn stats(
        section_id: &str,
        module_type: ModuleType,
        difficulty: Option<ModuleDifficulty>,
        time_limit: Option<i32>,
        question_count: i64,
    ) -> ModuleStats {
        ModuleStats {
            section_id: section_id.to_string(),
            module_type,
            difficulty,
            time_limit,
            question_count,
        }
    }

    #[test]
    fn adaptive_pair_collapses_to_one_module_with_averaged_questions() {
        let modules = vec![
            stats("s1", ModuleType::Routing, None, None, 20),
            stats("s1", ModuleType::Adaptive, Some(ModuleDifficulty::Easy), None, 10),
            stats("s1", ModuleType::Adaptive, Some(ModuleDifficulty::Hard), None, 14),
        ];

        let summary = resolve_summary(&exam(None), &modules, 1, None);

        assert_eq!(summary.module_count, 2);
        assert_eq!(summary.total_questions, 32);
        assert_eq!(summary.section_count, 1);
    }

    #[test]
    fn plain_modules_each_count() {
        let modules = vec![
            stats("s1", ModuleType::Plain, None, None, 12),
            stats("s1", ModuleType::Plain, None, None, 8),
        ];

        let summary = resolve_summary(&exam(None), &modules, 1, None);

        assert_eq!(summary.module_count, 2);
        assert_eq!(summary.total_questions, 20);
    }

    #[test]
    fn lone_adaptive_variant_contributes_its_own_count() {
        let modules =
            vec![stats("s1", ModuleType::Adaptive, Some(ModuleDifficulty::Hard), None, 14)];

        let summary = resolve_summary(&exam(None), &modules, 1, None);

        assert_eq!(summary.module_count, 1);
        assert_eq!(summary.total_questions, 14);
    }

    #[test]
    fn adaptive_without_difficulty_counts_as_always_taken() {
        let modules = vec![stats("s1", ModuleType::Adaptive, None, None, 9)];

        let summary = resolve_summary(&exam(None), &modules, 1, None);

        assert_eq!(summary.module_count, 1);
        assert_eq!(summary.total_questions, 9);
    }

    #[test]
    fn sections_are_independent() {
        let modules = vec![
            stats("s1", ModuleType::Routing, None, None, 27),
            stats("s1", ModuleType::Adaptive, Some(ModuleDifficulty::Easy), None, 27),
            stats("s1", ModuleType::Adaptive, Some(ModuleDifficulty::Hard), None, 27),
            stats("s2", ModuleType::Routing, None, None, 22),
            stats("s2", ModuleType::Adaptive, Some(ModuleDifficulty::Easy), None, 22),
            stats("s2", ModuleType::Adaptive, Some(ModuleDifficulty::Hard), None, 22),
        ];

        let summary = resolve_summary(&exam(None), &modules, 2, None);

        assert_eq!(summary.module_count, 4);
        assert_eq!(summary.total_questions, 98);
        assert_eq!(summary.section_count, 2);
    }

    #[test]
    fn duration_values_above_threshold_are_seconds() {
        assert_eq!(normalize_minutes(70), 70);
        assert_eq!(normalize_minutes(300), 300);
        assert_eq!(normalize_minutes(301), 5);
        assert_eq!(normalize_minutes(8040), 134);
    }

    #[test]
    fn duration_accumulates_module_limits() {
        let modules = vec![
            stats("s1", ModuleType::Plain, None, Some(70), 10),
            stats("s2", ModuleType::Plain, None, Some(8040), 10),
        ];

        let summary = resolve_summary(&exam(Some(999)), &modules, 2, None);

        assert_eq!(summary.duration_minutes, 204);
    }

    #[test]
    fn adaptive_pair_duration_counts_once() {
        let modules = vec![
            stats("s1", ModuleType::Routing, None, Some(32), 20),
            stats("s1", ModuleType::Adaptive, Some(ModuleDifficulty::Easy), Some(1920), 10),
            stats("s1", ModuleType::Adaptive, Some(ModuleDifficulty::Hard), Some(32), 14),
        ];

        let summary = resolve_summary(&exam(None), &modules, 1, None);

        // 32 routing + avg(32, 32) adaptive, not 32 + 64.
        assert_eq!(summary.duration_minutes, 64);
    }

    #[test]
    fn duration_falls_back_to_exam_limit_when_no_module_has_one() {
        let modules = vec![stats("s1", ModuleType::Plain, None, None, 10)];

        let summary = resolve_summary(&exam(Some(45)), &modules, 1, None);
        assert_eq!(summary.duration_minutes, 45);

        let summary = resolve_summary(&exam(None), &modules, 1, None);
        assert_eq!(summary.duration_minutes, 0);
    }

    #[test]
    fn composite_totals_clamp_to_canonical() {
        let modules = vec![
            stats("s1", ModuleType::Plain, None, None, 60),
            stats("s2", ModuleType::Plain, None, None, 60),
            stats("s3", ModuleType::Plain, None, None, 60),
        ];
        let canonical = CanonicalTotals { total_questions: 98, module_count: 4 };

        let summary = resolve_summary(&exam(None), &modules, 3, Some(&canonical));

        assert_eq!(summary.total_questions, 98);
        assert_eq!(summary.module_count, 4);
    }

    #[test]
    fn clamp_leaves_smaller_exams_alone() {
        let modules = vec![stats("s1", ModuleType::Plain, None, None, 40)];
        let canonical = CanonicalTotals { total_questions: 98, module_count: 4 };

        let summary = resolve_summary(&exam(None), &modules, 1, Some(&canonical));

        assert_eq!(summary.total_questions, 40);
        assert_eq!(summary.module_count, 1);
    }

    #[test]
    fn empty_structure_resolves_to_zeros() {
        let summary = resolve_summary(&exam(None), &[], 0, None);

        assert_eq!(summary.total_questions, 0);
        assert_eq!(summary.module_count, 0);
        assert_eq!(summary.duration_minutes, 0);
        assert_eq!(summary.section_count, 0);
    }
}
