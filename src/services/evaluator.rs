use crate::domain::checklist::{CheckId, ChecklistState, MissingCheckError};
use crate::domain::verdict::{FailReason, Verdict};

/// A rule fails when any of its checks is unticked.
struct Rule {
    reason: FailReason,
    checks: &'static [CheckId],
}

impl Rule {
    fn fails(&self, state: &ChecklistState) -> Result<bool, MissingCheckError> {
        for id in self.checks {
            if !state.get(*id)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

// Priority order. The first failing rule is the primary reason, so reordering
// changes what reviewers see for multi-failure states.
const RULES: [Rule; 12] = [
    Rule {
        reason: FailReason::MissingImages,
        checks: &[
            CheckId::ASourceProvided,
            CheckId::ATargetProvided,
            CheckId::AOutputProvided,
        ],
    },
    Rule {
        reason: FailReason::SourceIdentityUnclear,
        checks: &[CheckId::BSourceFaceClear, CheckId::BSourceNoDistortions],
    },
    Rule {
        reason: FailReason::TargetNotVerifiable,
        checks: &[
            CheckId::CTargetExpressionReadable,
            CheckId::CTargetPoseReadable,
            CheckId::CTargetMouthReadable,
        ],
    },
    Rule {
        reason: FailReason::IdentityNotPreserved,
        checks: &[
            CheckId::DOutputIdentityPreserved,
            CheckId::DOutputFeaturesMatch,
        ],
    },
    Rule {
        reason: FailReason::ExpressionMismatch,
        checks: &[CheckId::EExpressionMatch],
    },
    Rule {
        reason: FailReason::HeadPoseMismatch,
        checks: &[CheckId::EPoseMatch],
    },
    Rule {
        reason: FailReason::MouthPositionMismatch,
        checks: &[CheckId::EMouthMatch],
    },
    Rule {
        reason: FailReason::VisibleArtifacts,
        checks: &[
            CheckId::FNoCutoutEdges,
            CheckId::FNoWarping,
            CheckId::FNoDoubleFeatures,
            CheckId::FSharpnessConsistent,
            CheckId::FLightingConsistent,
        ],
    },
    Rule {
        reason: FailReason::GenderBodyInconsistency,
        checks: &[CheckId::GNoGenderBodyMismatch],
    },
    Rule {
        reason: FailReason::SkinToneInconsistency,
        checks: &[CheckId::GSkinToneMatches, CheckId::GNoWeirdTint],
    },
    Rule {
        reason: FailReason::UnnaturalHairBlending,
        checks: &[
            CheckId::GHairlineNatural,
            CheckId::GNoHairOverlapWeirdness,
        ],
    },
    Rule {
        reason: FailReason::AnatomicalArtifact,
        checks: &[
            CheckId::HNoDisfiguredLimbs,
            CheckId::HNoExtraMissingLimbs,
            CheckId::HNoBackgroundGlitch,
        ],
    },
];

/// Runs the rule chain and returns the verdict for the first failing rule.
///
/// The state must be complete: a missing check is reported even when an earlier rule
/// would have short-circuited past it.
pub fn evaluate(state: &ChecklistState) -> Result<Verdict, MissingCheckError> {
    state.ensure_complete()?;
    for rule in &RULES {
        if rule.fails(state)? {
            return Ok(Verdict::Fail(rule.reason));
        }
    }
    Ok(Verdict::Pass)
}

/// Every failing rule in priority order. The head of the list is the primary reason.
pub fn failing_reasons(state: &ChecklistState) -> Result<Vec<FailReason>, MissingCheckError> {
    state.ensure_complete()?;
    let mut out = Vec::new();
    for rule in &RULES {
        if rule.fails(state)? {
            out.push(rule.reason);
        }
    }
    Ok(out)
}
