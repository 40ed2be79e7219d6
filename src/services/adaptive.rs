use crate::db::models::ExamModule;
use crate::db::types::{ModuleDifficulty, ModuleType};

/// Decides which adaptive variant follows the routing module. The actual
/// thresholding lives upstream (the router that scores the routing module);
/// delivery only consumes the decision.
#[allow(dead_code)]
pub(crate) trait AdaptiveVariantPolicy: Send + Sync {
    /// `routing_module_score` is the routing-module fraction in [0, 1].
    fn choose_variant(&self, routing_module_score: f64) -> ModuleDifficulty;
}

/// Whether a module belongs in a delivery view for the given variant choice.
/// With no choice supplied both variants are shown (pre-routing preview).
pub(crate) fn module_in_variant(
    module: &ExamModule,
    chosen: Option<ModuleDifficulty>,
) -> bool {
    if !matches!(module.module_type, ModuleType::Adaptive) {
        return true;
    }
    match chosen {
        Some(variant) => module.difficulty == Some(variant),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;

    struct ThresholdPolicy {
        cutoff: f64,
    }

    impl AdaptiveVariantPolicy for ThresholdPolicy {
        fn choose_variant(&self, routing_module_score: f64) -> ModuleDifficulty {
            if routing_module_score >= self.cutoff {
                ModuleDifficulty::Hard
            } else {
                ModuleDifficulty::Easy
            }
        }
    }

    fn module(module_type: ModuleType, difficulty: Option<ModuleDifficulty>) -> ExamModule {
        let now = primitive_now_utc();
        ExamModule {
            id: "m1".to_string(),
            section_id: "s1".to_string(),
            module_type,
            difficulty,
            time_limit: None,
            position: 1,
            created_at: now,
        }
    }

    #[test]
    fn policy_seam_drives_variant_filtering() {
        let policy = ThresholdPolicy { cutoff: 0.6 };
        let easy = module(ModuleType::Adaptive, Some(ModuleDifficulty::Easy));
        let hard = module(ModuleType::Adaptive, Some(ModuleDifficulty::Hard));

        let chosen = policy.choose_variant(0.75);
        assert_eq!(chosen, ModuleDifficulty::Hard);
        assert!(!module_in_variant(&easy, Some(chosen)));
        assert!(module_in_variant(&hard, Some(chosen)));

        let chosen = policy.choose_variant(0.4);
        assert_eq!(chosen, ModuleDifficulty::Easy);
        assert!(module_in_variant(&easy, Some(chosen)));
    }

    #[test]
    fn routing_and_plain_modules_are_always_shown() {
        let routing = module(ModuleType::Routing, None);
        let plain = module(ModuleType::Plain, None);

        for chosen in [None, Some(ModuleDifficulty::Easy), Some(ModuleDifficulty::Hard)] {
            assert!(module_in_variant(&routing, chosen));
            assert!(module_in_variant(&plain, chosen));
        }
    }

    #[test]
    fn both_variants_shown_without_a_routing_decision() {
        let easy = module(ModuleType::Adaptive, Some(ModuleDifficulty::Easy));
        let hard = module(ModuleType::Adaptive, Some(ModuleDifficulty::Hard));

        assert!(module_in_variant(&easy, None));
        assert!(module_in_variant(&hard, None));
    }
}
