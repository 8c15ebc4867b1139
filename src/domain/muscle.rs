use serde::{Deserialize, Serialize};

/// One of the four quizzable attributes of a muscle.
///
/// Each kind carries its question-text template and knows how to read the
/// matching attribute off a [`Muscle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
  Origin,
  Insertion,
  Innervation,
  Vascularization,
}

impl AttributeKind {
  pub const ALL: [AttributeKind; 4] = [
    Self::Origin,
    Self::Insertion,
    Self::Innervation,
    Self::Vascularization,
  ];

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "origin" => Some(Self::Origin),
      "insertion" => Some(Self::Insertion),
      "innervation" => Some(Self::Innervation),
      "vascularization" => Some(Self::Vascularization),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Origin => "origin",
      Self::Insertion => "insertion",
      Self::Innervation => "innervation",
      Self::Vascularization => "vascularization",
    }
  }

  /// Display label, matching the source data language.
  pub fn label(&self) -> &'static str {
    match self {
      Self::Origin => "Origine",
      Self::Insertion => "Terminaison",
      Self::Innervation => "Innervation",
      Self::Vascularization => "Vascularisation",
    }
  }

  /// Render the question text for a muscle name.
  pub fn question_text(&self, muscle_name: &str) -> String {
    match self {
      Self::Origin => format!("Quelle est l'origine du {}?", muscle_name),
      Self::Insertion => format!("Quelle est la terminaison du {}?", muscle_name),
      Self::Innervation => format!("Quelle est l'innervation du {}?", muscle_name),
      Self::Vascularization => format!("Quelle est la vascularisation du {}?", muscle_name),
    }
  }

  /// The muscle's value for this attribute.
  pub fn value_of<'a>(&self, muscle: &'a Muscle) -> &'a str {
    match self {
      Self::Origin => &muscle.origin,
      Self::Insertion => &muscle.insertion,
      Self::Innervation => &muscle.innervation,
      Self::Vascularization => &muscle.vascularization,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleCategory {
  UpperLimb,
  LowerLimb,
  Trunk,
}

impl MuscleCategory {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "upper_limb" => Some(Self::UpperLimb),
      "lower_limb" => Some(Self::LowerLimb),
      "trunk" => Some(Self::Trunk),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::UpperLimb => "upper_limb",
      Self::LowerLimb => "lower_limb",
      Self::Trunk => "trunk",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::UpperLimb => "Membre supérieur",
      Self::LowerLimb => "Membre inférieur",
      Self::Trunk => "Tronc",
    }
  }
}

/// Anatomical region within a category. Informational only: the quiz engine
/// never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleSubcategory {
  // Upper limb
  ShoulderAnterior,
  ShoulderPosterior,
  Arm,
  ForearmAnterior,
  ForearmPosterior,
  Hand,
  // Lower limb
  Hip,
  Thigh,
  Leg,
  Foot,
  // Trunk
  NeckAndNape,
  Back,
  ThoraxAndAbdomen,
}

impl MuscleSubcategory {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "shoulder_anterior" => Some(Self::ShoulderAnterior),
      "shoulder_posterior" => Some(Self::ShoulderPosterior),
      "arm" => Some(Self::Arm),
      "forearm_anterior" => Some(Self::ForearmAnterior),
      "forearm_posterior" => Some(Self::ForearmPosterior),
      "hand" => Some(Self::Hand),
      "hip" => Some(Self::Hip),
      "thigh" => Some(Self::Thigh),
      "leg" => Some(Self::Leg),
      "foot" => Some(Self::Foot),
      "neck_and_nape" => Some(Self::NeckAndNape),
      "back" => Some(Self::Back),
      "thorax_and_abdomen" => Some(Self::ThoraxAndAbdomen),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::ShoulderAnterior => "shoulder_anterior",
      Self::ShoulderPosterior => "shoulder_posterior",
      Self::Arm => "arm",
      Self::ForearmAnterior => "forearm_anterior",
      Self::ForearmPosterior => "forearm_posterior",
      Self::Hand => "hand",
      Self::Hip => "hip",
      Self::Thigh => "thigh",
      Self::Leg => "leg",
      Self::Foot => "foot",
      Self::NeckAndNape => "neck_and_nape",
      Self::Back => "back",
      Self::ThoraxAndAbdomen => "thorax_and_abdomen",
    }
  }
}

/// A muscle record. Loaded by the repository at startup; read-only to the
/// quiz engine afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Muscle {
  pub id: i64,
  pub name: String,
  pub origin: String,
  pub insertion: String,
  pub innervation: String,
  pub vascularization: String,
  pub category: MuscleCategory,
  pub subcategory: MuscleSubcategory,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_muscle() -> Muscle {
    Muscle {
      id: 1,
      name: "biceps brachial".to_string(),
      origin: "Processus coracoïde et tubercule supra-glénoïdal".to_string(),
      insertion: "Tubérosité radiale".to_string(),
      innervation: "Nerf musculo-cutané".to_string(),
      vascularization: "Artère brachiale".to_string(),
      category: MuscleCategory::UpperLimb,
      subcategory: MuscleSubcategory::Arm,
    }
  }

  #[test]
  fn test_kind_round_trip() {
    for kind in AttributeKind::ALL {
      assert_eq!(AttributeKind::from_str(kind.as_str()), Some(kind));
    }
    assert_eq!(AttributeKind::from_str("bogus"), None);
  }

  #[test]
  fn test_kind_accessor() {
    let m = sample_muscle();
    assert_eq!(AttributeKind::Insertion.value_of(&m), "Tubérosité radiale");
    assert_eq!(AttributeKind::Innervation.value_of(&m), "Nerf musculo-cutané");
  }

  #[test]
  fn test_question_text_embeds_name() {
    let text = AttributeKind::Origin.question_text("biceps brachial");
    assert_eq!(text, "Quelle est l'origine du biceps brachial?");
  }

  #[test]
  fn test_category_round_trip() {
    for cat in [
      MuscleCategory::UpperLimb,
      MuscleCategory::LowerLimb,
      MuscleCategory::Trunk,
    ] {
      assert_eq!(MuscleCategory::from_str(cat.as_str()), Some(cat));
    }
  }
}
