//! Melody persistence integration tests
//!
//! Exercises the full save/list/load/delete cycle against a real (temporary)
//! filesystem, including the recorder import path.

use voxroll::{Melody, MelodyError, MelodyLibrary, MelodyRecorder, Note, SynthPreset};

fn take(names: &[(&str, f64, f64)]) -> Vec<Note> {
    names
        .iter()
        .map(|(name, start, duration)| Note::new(*name, *start, *duration))
        .collect()
}

#[test]
fn save_load_and_replay_a_melody() {
    let dir = tempfile::tempdir().unwrap();
    let library = MelodyLibrary::new(dir.path());

    let notes = take(&[("A4", 0.0, 0.5), ("C5", 0.5, 0.25), ("G5", 1.0, 1.0)]);
    let stored = library
        .save_melody(&Melody::from_take("verse idea", 96, &notes))
        .unwrap();

    let loaded = library.load_melody(stored.id.as_deref().unwrap()).unwrap();
    assert_eq!(loaded.name, "verse idea");
    assert_eq!(loaded.bpm, 96);

    // Imported takes bypass collision checks and adopt the saved tempo
    let mut recorder = MelodyRecorder::new();
    assert!(recorder.load_take(loaded.bpm, loaded.to_notes()));
    assert_eq!(recorder.session().bpm(), 96);
    assert_eq!(recorder.store().notes(), notes.as_slice());
}

#[test]
fn melodies_list_in_creation_order() {
    let dir = tempfile::tempdir().unwrap();
    let library = MelodyLibrary::new(dir.path());

    let notes = take(&[("A4", 0.0, 0.5)]);
    for (name, stamp) in [
        ("second", "2026-02-01T00:00:00Z"),
        ("first", "2026-01-01T00:00:00Z"),
        ("third", "2026-03-01T00:00:00Z"),
    ] {
        let mut melody = Melody::from_take(name, 120, &notes);
        melody.created_at = stamp.to_string();
        library.save_melody(&melody).unwrap();
    }

    let names: Vec<String> = library
        .list_melodies()
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, ["first", "second", "third"]);
}

#[test]
fn deleted_melody_disappears_from_the_list() {
    let dir = tempfile::tempdir().unwrap();
    let library = MelodyLibrary::new(dir.path());

    let notes = take(&[("A4", 0.0, 0.5)]);
    let keep = library.save_melody(&Melody::from_take("keep", 120, &notes)).unwrap();
    let scrap = library.save_melody(&Melody::from_take("scrap", 120, &notes)).unwrap();

    library.delete_melody(scrap.id.as_deref().unwrap()).unwrap();

    let remaining = library.list_melodies().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
}

#[test]
fn corrupted_file_fails_validation_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let library = MelodyLibrary::new(dir.path());

    let notes = take(&[("A4", 0.0, 0.5)]);
    let stored = library.save_melody(&Melody::from_take("ok", 120, &notes)).unwrap();
    let id = stored.id.unwrap();

    // Hand-edit the file into an out-of-range pitch
    let path = library.melodies_dir().join(format!("{id}.json"));
    let tampered = std::fs::read_to_string(&path).unwrap().replace("A4", "C9");
    std::fs::write(&path, tampered).unwrap();

    assert!(matches!(
        library.load_melody(&id),
        Err(MelodyError::Validation(_))
    ));
}

#[test]
fn presets_round_trip_alongside_melodies() {
    let dir = tempfile::tempdir().unwrap();
    let library = MelodyLibrary::new(dir.path());

    let mut preset = SynthPreset::default();
    preset.name = "bright lead".to_string();
    preset.adsr.attack = 0.01;
    library.save_preset(&preset).unwrap();

    let mut second = SynthPreset::default();
    second.name = "soft pad".to_string();
    library.save_preset(&second).unwrap();

    assert_eq!(
        library.list_presets().unwrap(),
        vec!["bright lead".to_string(), "soft pad".to_string()]
    );
    assert_eq!(library.load_preset("bright lead").unwrap().adsr.attack, 0.01);
}
