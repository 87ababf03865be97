use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Reviewer-facing groups of checks, in rule priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    InputCompleteness,
    SourceSanity,
    TargetAnchor,
    IdentityPreservation,
    TargetMatch,
    Photorealism,
    Consistency,
    AnatomyIntegrity,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::InputCompleteness,
        Category::SourceSanity,
        Category::TargetAnchor,
        Category::IdentityPreservation,
        Category::TargetMatch,
        Category::Photorealism,
        Category::Consistency,
        Category::AnatomyIntegrity,
    ];

    pub fn letter(self) -> char {
        match self {
            Category::InputCompleteness => 'A',
            Category::SourceSanity => 'B',
            Category::TargetAnchor => 'C',
            Category::IdentityPreservation => 'D',
            Category::TargetMatch => 'E',
            Category::Photorealism => 'F',
            Category::Consistency => 'G',
            Category::AnatomyIntegrity => 'H',
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::InputCompleteness => "Input Completeness",
            Category::SourceSanity => "Source Image Sanity (Source Only)",
            Category::TargetAnchor => "Target Anchor (Target Only — Must Preserve)",
            Category::IdentityPreservation => "Identity Preservation (Source → Output)",
            Category::TargetMatch => "Target Match (Target → Output)",
            Category::Photorealism => "Photorealism & Blend (Output Only)",
            Category::Consistency => "Consistency (Output Logic)",
            Category::AnatomyIntegrity => "Anatomy & Scene Integrity",
        }
    }

    pub fn checks(self) -> impl Iterator<Item = CheckId> {
        CheckId::ALL.into_iter().filter(move |c| c.category() == self)
    }
}

/// One boolean reviewer judgment. Serialized as its snake_case id, e.g. `a_source_provided`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    ASourceProvided,
    ATargetProvided,
    AOutputProvided,
    BSourceFaceClear,
    BSourceNoDistortions,
    CTargetExpressionReadable,
    CTargetPoseReadable,
    CTargetMouthReadable,
    DOutputIdentityPreserved,
    DOutputFeaturesMatch,
    EExpressionMatch,
    EPoseMatch,
    EMouthMatch,
    FNoCutoutEdges,
    FNoWarping,
    FNoDoubleFeatures,
    FSharpnessConsistent,
    FLightingConsistent,
    GNoGenderBodyMismatch,
    GSkinToneMatches,
    GNoWeirdTint,
    GHairlineNatural,
    GNoHairOverlapWeirdness,
    HNoDisfiguredLimbs,
    HNoExtraMissingLimbs,
    HNoBackgroundGlitch,
}

impl CheckId {
    pub const ALL: [CheckId; 26] = [
        CheckId::ASourceProvided,
        CheckId::ATargetProvided,
        CheckId::AOutputProvided,
        CheckId::BSourceFaceClear,
        CheckId::BSourceNoDistortions,
        CheckId::CTargetExpressionReadable,
        CheckId::CTargetPoseReadable,
        CheckId::CTargetMouthReadable,
        CheckId::DOutputIdentityPreserved,
        CheckId::DOutputFeaturesMatch,
        CheckId::EExpressionMatch,
        CheckId::EPoseMatch,
        CheckId::EMouthMatch,
        CheckId::FNoCutoutEdges,
        CheckId::FNoWarping,
        CheckId::FNoDoubleFeatures,
        CheckId::FSharpnessConsistent,
        CheckId::FLightingConsistent,
        CheckId::GNoGenderBodyMismatch,
        CheckId::GSkinToneMatches,
        CheckId::GNoWeirdTint,
        CheckId::GHairlineNatural,
        CheckId::GNoHairOverlapWeirdness,
        CheckId::HNoDisfiguredLimbs,
        CheckId::HNoExtraMissingLimbs,
        CheckId::HNoBackgroundGlitch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckId::ASourceProvided => "a_source_provided",
            CheckId::ATargetProvided => "a_target_provided",
            CheckId::AOutputProvided => "a_output_provided",
            CheckId::BSourceFaceClear => "b_source_face_clear",
            CheckId::BSourceNoDistortions => "b_source_no_distortions",
            CheckId::CTargetExpressionReadable => "c_target_expression_readable",
            CheckId::CTargetPoseReadable => "c_target_pose_readable",
            CheckId::CTargetMouthReadable => "c_target_mouth_readable",
            CheckId::DOutputIdentityPreserved => "d_output_identity_preserved",
            CheckId::DOutputFeaturesMatch => "d_output_features_match",
            CheckId::EExpressionMatch => "e_expression_match",
            CheckId::EPoseMatch => "e_pose_match",
            CheckId::EMouthMatch => "e_mouth_match",
            CheckId::FNoCutoutEdges => "f_no_cutout_edges",
            CheckId::FNoWarping => "f_no_warping",
            CheckId::FNoDoubleFeatures => "f_no_double_features",
            CheckId::FSharpnessConsistent => "f_sharpness_consistent",
            CheckId::FLightingConsistent => "f_lighting_consistent",
            CheckId::GNoGenderBodyMismatch => "g_no_gender_body_mismatch",
            CheckId::GSkinToneMatches => "g_skin_tone_matches",
            CheckId::GNoWeirdTint => "g_no_weird_tint",
            CheckId::GHairlineNatural => "g_hairline_natural",
            CheckId::GNoHairOverlapWeirdness => "g_no_hair_overlap_weirdness",
            CheckId::HNoDisfiguredLimbs => "h_no_disfigured_limbs",
            CheckId::HNoExtraMissingLimbs => "h_no_extra_missing_limbs",
            CheckId::HNoBackgroundGlitch => "h_no_background_glitch",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CheckId::ASourceProvided => "Source image provided",
            CheckId::ATargetProvided => "Target image provided",
            CheckId::AOutputProvided => "Output image provided",
            CheckId::BSourceFaceClear => "Source face is clearly visible",
            CheckId::BSourceNoDistortions => {
                "No obvious distortions in Source that prevent identity reading"
            }
            CheckId::CTargetExpressionReadable => "Target expression is clearly readable",
            CheckId::CTargetPoseReadable => "Target head pose is clearly readable",
            CheckId::CTargetMouthReadable => "Target mouth position is clearly readable",
            CheckId::DOutputIdentityPreserved => "Output clearly preserves Source identity",
            CheckId::DOutputFeaturesMatch => "Key facial structure/features match Source",
            CheckId::EExpressionMatch => "Output expression matches Target",
            CheckId::EPoseMatch => "Output head pose matches Target",
            CheckId::EMouthMatch => "Output mouth position matches Target",
            CheckId::FNoCutoutEdges => "No visible face cutout edges / hard seams",
            CheckId::FNoWarping => "No warping around jaw/cheeks/ears/eyes/teeth",
            CheckId::FNoDoubleFeatures => {
                "No double-features (ghost teeth, extra eyes, duplicated nose)"
            }
            CheckId::FSharpnessConsistent => {
                "Face sharpness matches scene (not pasted/over-smoothed)"
            }
            CheckId::FLightingConsistent => "Lighting/shadows consistent with scene",
            CheckId::GNoGenderBodyMismatch => "No obvious gender/body-type mismatch",
            CheckId::GSkinToneMatches => "Face tone matches neck/body",
            CheckId::GNoWeirdTint => "No weird tint (gray/green/orange)",
            CheckId::GHairlineNatural => "Hairline looks natural",
            CheckId::GNoHairOverlapWeirdness => {
                "No unnatural hair overlap around temples/forehead"
            }
            CheckId::HNoDisfiguredLimbs => "No disfigured limbs/hands/fingers in Output",
            CheckId::HNoExtraMissingLimbs => "No missing/extra limbs or impossible geometry",
            CheckId::HNoBackgroundGlitch => "No background bending/glitching caused by swap",
        }
    }

    pub fn category(self) -> Category {
        use CheckId::*;
        match self {
            ASourceProvided | ATargetProvided | AOutputProvided => Category::InputCompleteness,
            BSourceFaceClear | BSourceNoDistortions => Category::SourceSanity,
            CTargetExpressionReadable | CTargetPoseReadable | CTargetMouthReadable => {
                Category::TargetAnchor
            }
            DOutputIdentityPreserved | DOutputFeaturesMatch => Category::IdentityPreservation,
            EExpressionMatch | EPoseMatch | EMouthMatch => Category::TargetMatch,
            FNoCutoutEdges | FNoWarping | FNoDoubleFeatures | FSharpnessConsistent
            | FLightingConsistent => Category::Photorealism,
            GNoGenderBodyMismatch | GSkinToneMatches | GNoWeirdTint | GHairlineNatural
            | GNoHairOverlapWeirdness => Category::Consistency,
            HNoDisfiguredLimbs | HNoExtraMissingLimbs | HNoBackgroundGlitch => {
                Category::AnatomyIntegrity
            }
        }
    }

    /// Input checks start unticked so the reviewer confirms them by hand; everything else
    /// starts as OK.
    pub fn default_value(self) -> bool {
        self.category() != Category::InputCompleteness
    }

    /// All ids in lexicographic order of their string form (the log column order).
    pub fn sorted_by_id() -> Vec<CheckId> {
        let mut ids = CheckId::ALL.to_vec();
        ids.sort_by_key(|c| c.as_str());
        ids
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckId {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        CheckId::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| StateError::UnknownCheck(key.to_string()))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("checklist state is missing required check: {id}")]
pub struct MissingCheckError {
    pub id: CheckId,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("unknown check id: {0}")]
    UnknownCheck(String),
    #[error("invalid boolean value for {id}: {value}")]
    InvalidValue { id: String, value: String },
    #[error("expected <check>=<bool>, got: {0}")]
    MalformedAssignment(String),
}

/// Parses the boolean spellings accepted on the command line and in log cells.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Parses a `<check>=<bool>` override.
pub fn parse_assignment(raw: &str) -> Result<(CheckId, bool), StateError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| StateError::MalformedAssignment(raw.to_string()))?;
    let id: CheckId = key.parse()?;
    let flag = parse_flag(value).ok_or_else(|| StateError::InvalidValue {
        id: id.to_string(),
        value: value.trim().to_string(),
    })?;
    Ok((id, flag))
}

/// Value snapshot of the reviewer's ticked boxes.
///
/// The map may be incomplete while a front-end is assembling it; [`ensure_complete`]
/// is the gate the evaluator uses before deciding anything.
///
/// [`ensure_complete`]: ChecklistState::ensure_complete
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistState {
    values: BTreeMap<CheckId, bool>,
}

impl ChecklistState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn defaults() -> Self {
        Self {
            values: CheckId::ALL
                .into_iter()
                .map(|c| (c, c.default_value()))
                .collect(),
        }
    }

    pub fn all_ok() -> Self {
        Self {
            values: CheckId::ALL.into_iter().map(|c| (c, true)).collect(),
        }
    }

    /// Converts a loosely typed map (state files, log rows) into a state. Unknown ids are
    /// rejected; missing ids are left for the evaluator to report.
    pub fn from_raw(raw: BTreeMap<String, bool>) -> Result<Self, StateError> {
        let mut values = BTreeMap::new();
        for (key, value) in raw {
            values.insert(key.parse::<CheckId>()?, value);
        }
        Ok(Self { values })
    }

    /// Ticks every check except the input-completeness ones, which stay manual.
    pub fn mark_all_ok(&mut self) {
        for id in CheckId::ALL {
            if id.category() != Category::InputCompleteness {
                self.values.insert(id, true);
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::defaults();
    }

    pub fn set(&mut self, id: CheckId, value: bool) {
        self.values.insert(id, value);
    }

    pub fn with(mut self, id: CheckId, value: bool) -> Self {
        self.set(id, value);
        self
    }

    pub fn remove(&mut self, id: CheckId) -> Option<bool> {
        self.values.remove(&id)
    }

    pub fn get(&self, id: CheckId) -> Result<bool, MissingCheckError> {
        self.values
            .get(&id)
            .copied()
            .ok_or(MissingCheckError { id })
    }

    pub fn ensure_complete(&self) -> Result<(), MissingCheckError> {
        match CheckId::ALL.into_iter().find(|c| !self.values.contains_key(c)) {
            Some(id) => Err(MissingCheckError { id }),
            None => Ok(()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CheckId, bool)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
