use chrono::NaiveDate;
use dirty_tracker::{
    FormSession, Surface, TrackerConfig,
    snapshot::snapshot_model::FieldMap,
};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

pub fn alice() -> FieldMap {
    FieldMap::new()
        .with("username", "alice")
        .with("password", "")
        .with("selectedPatients", vec![1u64])
}

pub fn valid_user() -> FieldMap {
    FieldMap::new()
        .with("username", "alice")
        .with("password", "secret")
        .with("selectedPatients", vec![1u64, 4])
}

/// A patient as the form holds it once opened, every field valid.
pub fn valid_patient() -> FieldMap {
    FieldMap::new()
        .with("nom_complet", "Amina Ben Salah")
        .with("cin", "01234567")
        .with("ass_cnss", "CN-4411")
        .with("date_naissance", "1980-05-17")
        .with("sexe", "Femme")
        .with("groupe_sanguin", "O+")
        .with("profession", "")
        .with("situation_familiale", "")
        .with("telephone", "22123456")
        .with("telephone_urgence", "")
        .with("adresse", "")
        .with("date_debut", "2015-09-01")
        .with("type_patient", "Permanent")
        .with("date_fin", "")
        .with("cause_fin", "")
}

pub fn session(surface: Surface) -> FormSession {
    FormSession::new(surface.schema(), TrackerConfig::default())
}

pub fn session_with(surface: Surface, config: TrackerConfig) -> FormSession {
    FormSession::new(surface.schema(), config)
}

/// Fresh path under the system temp dir.
pub fn temp_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("dirty-tracker-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}
