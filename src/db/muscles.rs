use rusqlite::{params, Connection, Result};

use crate::domain::{Muscle, MuscleCategory, MuscleSubcategory};

pub fn insert_muscle(conn: &Connection, muscle: &Muscle) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO muscles (name, origin, insertion, innervation, vascularization, category, subcategory)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#,
    params![
      muscle.name,
      muscle.origin,
      muscle.insertion,
      muscle.innervation,
      muscle.vascularization,
      muscle.category.as_str(),
      muscle.subcategory.as_str(),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Load the full muscle bank. The quiz engine reads this once, at session
/// start.
pub fn load_all_muscles(conn: &Connection) -> Result<Vec<Muscle>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, name, origin, insertion, innervation, vascularization, category, subcategory
    FROM muscles
    ORDER BY id
    "#,
  )?;

  let muscles = stmt
    .query_map([], |row| row_to_muscle(row))?
    .collect::<Result<Vec<_>>>()?;
  Ok(muscles)
}

/// Restrict a pool to one category; `None` means no filter.
pub fn filter_by_category(pool: &[Muscle], category: Option<MuscleCategory>) -> Vec<Muscle> {
  match category {
    None => pool.to_vec(),
    Some(cat) => pool.iter().filter(|m| m.category == cat).cloned().collect(),
  }
}

fn row_to_muscle(row: &rusqlite::Row) -> Result<Muscle> {
  let category_str: String = row.get(6)?;
  let subcategory_str: String = row.get(7)?;

  Ok(Muscle {
    id: row.get(0)?,
    name: row.get(1)?,
    origin: row.get(2)?,
    insertion: row.get(3)?,
    innervation: row.get(4)?,
    vascularization: row.get(5)?,
    category: MuscleCategory::from_str(&category_str).unwrap_or(MuscleCategory::Trunk),
    subcategory: MuscleSubcategory::from_str(&subcategory_str)
      .unwrap_or(MuscleSubcategory::Back),
  })
}

/// Seed the baseline muscle bank on first launch. Does nothing if muscles
/// already exist.
pub fn seed_muscles(conn: &Connection) -> Result<()> {
  let count: i64 = conn.query_row("SELECT COUNT(*) FROM muscles", [], |row| row.get(0))?;
  if count > 0 {
    return Ok(());
  }

  use MuscleCategory::*;
  use MuscleSubcategory::*;

  let baseline: [(&str, &str, &str, &str, &str, MuscleCategory, MuscleSubcategory); 15] = [
    (
      "biceps brachial",
      "Processus coracoïde (chef court) et tubercule supra-glénoïdal (chef long)",
      "Tubérosité bicipitale du radius",
      "Nerf musculo-cutané",
      "Artère brachiale",
      UpperLimb,
      Arm,
    ),
    (
      "triceps brachial",
      "Tubercule infra-glénoïdal et face postérieure de l'humérus",
      "Olécrâne de l'ulna",
      "Nerf radial",
      "Artère brachiale profonde",
      UpperLimb,
      Arm,
    ),
    (
      "brachial",
      "Face antérieure de l'humérus",
      "Tubérosité de l'ulna",
      "Nerf musculo-cutané",
      "Artères récurrentes ulnaires",
      UpperLimb,
      Arm,
    ),
    (
      "deltoïde",
      "Clavicule, acromion et épine de la scapula",
      "Tubérosité deltoïdienne de l'humérus",
      "Nerf axillaire",
      "Artère circonflexe postérieure de l'humérus",
      UpperLimb,
      ShoulderAnterior,
    ),
    (
      "grand pectoral",
      "Clavicule, sternum et cartilages costaux",
      "Crête du tubercule majeur de l'humérus",
      "Nerfs pectoraux médial et latéral",
      "Artère thoraco-acromiale",
      UpperLimb,
      ShoulderAnterior,
    ),
    (
      "rond pronateur",
      "Épicondyle médial de l'humérus et processus coronoïde de l'ulna",
      "Face latérale du radius",
      "Nerf médian",
      "Artère ulnaire",
      UpperLimb,
      ForearmAnterior,
    ),
    (
      "grand fessier",
      "Face glutéale de l'ilium, sacrum et coccyx",
      "Tractus ilio-tibial et tubérosité glutéale du fémur",
      "Nerf glutéal inférieur",
      "Artères glutéales supérieure et inférieure",
      LowerLimb,
      Hip,
    ),
    (
      "droit fémoral",
      "Épine iliaque antéro-inférieure",
      "Base de la patella et tubérosité tibiale",
      "Nerf fémoral",
      "Artère fémorale",
      LowerLimb,
      Thigh,
    ),
    (
      "biceps fémoral",
      "Tubérosité ischiatique et ligne âpre du fémur",
      "Tête de la fibula",
      "Nerf sciatique",
      "Artères perforantes",
      LowerLimb,
      Thigh,
    ),
    (
      "tibial antérieur",
      "Face latérale du tibia",
      "Os cunéiforme médial et base du premier métatarsien",
      "Nerf fibulaire profond",
      "Artère tibiale antérieure",
      LowerLimb,
      Leg,
    ),
    (
      "triceps sural",
      "Condyles fémoraux et face postérieure du tibia",
      "Tubérosité du calcanéus par le tendon calcanéen",
      "Nerf tibial",
      "Artères surales",
      LowerLimb,
      Leg,
    ),
    (
      "trapèze",
      "Os occipital et processus épineux des vertèbres cervicales et thoraciques",
      "Clavicule, acromion et épine de la scapula",
      "Nerf accessoire",
      "Artère cervicale transverse",
      Trunk,
      NeckAndNape,
    ),
    (
      "sterno-cléido-mastoïdien",
      "Manubrium sternal et clavicule",
      "Processus mastoïde de l'os temporal",
      "Nerf accessoire",
      "Artère occipitale",
      Trunk,
      NeckAndNape,
    ),
    (
      "grand dorsal",
      "Processus épineux des vertèbres thoraciques inférieures, fascia thoraco-lombaire et crête iliaque",
      "Sillon intertuberculaire de l'humérus",
      "Nerf thoraco-dorsal",
      "Artère thoraco-dorsale",
      Trunk,
      Back,
    ),
    (
      "droit de l'abdomen",
      "Pubis",
      "Cartilages costaux 5 à 7 et processus xiphoïde",
      "Nerfs intercostaux",
      "Artères épigastriques supérieure et inférieure",
      Trunk,
      ThoraxAndAbdomen,
    ),
  ];

  for (name, origin, insertion, innervation, vascularization, category, subcategory) in baseline {
    let muscle = Muscle {
      id: 0,
      name: name.to_string(),
      origin: origin.to_string(),
      insertion: insertion.to_string(),
      innervation: innervation.to_string(),
      vascularization: vascularization.to_string(),
      category,
      subcategory,
    };
    insert_muscle(conn, &muscle)?;
  }

  tracing::info!("Seeded {} baseline muscles", baseline.len());
  Ok(())
}
