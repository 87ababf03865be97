use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of primary failure reasons. Category E and G each own three.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailReason {
    MissingImages,
    SourceIdentityUnclear,
    TargetNotVerifiable,
    IdentityNotPreserved,
    ExpressionMismatch,
    HeadPoseMismatch,
    MouthPositionMismatch,
    VisibleArtifacts,
    GenderBodyInconsistency,
    SkinToneInconsistency,
    UnnaturalHairBlending,
    AnatomicalArtifact,
}

impl FailReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FailReason::MissingImages => "missing required image(s)",
            FailReason::SourceIdentityUnclear => "source identity not clear enough",
            FailReason::TargetNotVerifiable => "target expression/pose not verifiable",
            FailReason::IdentityNotPreserved => "identity not preserved",
            FailReason::ExpressionMismatch => "expression mismatch (Target → Output)",
            FailReason::HeadPoseMismatch => "head pose mismatch (Target → Output)",
            FailReason::MouthPositionMismatch => "mouth position mismatch (Target → Output)",
            FailReason::VisibleArtifacts => "visible artifacts / unrealistic blending",
            FailReason::GenderBodyInconsistency => "gender/body inconsistency",
            FailReason::SkinToneInconsistency => "skin tone/lighting inconsistency",
            FailReason::UnnaturalHairBlending => "unnatural hair blending",
            FailReason::AnatomicalArtifact => "anatomical artifact / logical inconsistency",
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FailReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// PASS carries no reason; FAIL carries exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(FailReason),
}

impl Verdict {
    pub fn outcome(&self) -> Outcome {
        match self {
            Verdict::Pass => Outcome::Pass,
            Verdict::Fail(_) => Outcome::Fail,
        }
    }

    pub fn reason(&self) -> Option<FailReason> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(r) => Some(*r),
        }
    }

    /// Reason text as persisted: empty for PASS.
    pub fn primary_reason(&self) -> &'static str {
        self.reason().map(FailReason::as_str).unwrap_or("")
    }
}

impl Serialize for Verdict {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Verdict", 2)?;
        s.serialize_field("result", &self.outcome())?;
        s.serialize_field("primary_fail_reason", self.primary_reason())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_has_empty_reason() {
        assert_eq!(Verdict::Pass.primary_reason(), "");
        assert_eq!(Verdict::Pass.outcome(), Outcome::Pass);
    }

    #[test]
    fn verdict_serializes_as_result_and_reason() {
        let v = serde_json::to_value(Verdict::Fail(FailReason::HeadPoseMismatch)).unwrap();
        assert_eq!(v["result"], "FAIL");
        assert_eq!(v["primary_fail_reason"], "head pose mismatch (Target → Output)");
    }
}
