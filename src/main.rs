// voxroll console demo
// Runs a scripted vocal take through the recorder and walks through the
// editing operations, printing the piano roll state at each step

use voxroll::{Frame, Melody, MelodyLibrary, MelodyRecorder, Note};

const FRAME_STEP_SEC: f64 = 0.02;

fn main() {
    println!("=== voxroll ===");
    println!("Voice-to-piano-roll demo (scripted frames, no microphone)\n");

    let mut recorder = MelodyRecorder::new();
    recorder.start_recording();
    println!("Recording at {}...", recorder.session());

    // A short hummed phrase: A4, breath, C5, jump up to G5
    sing(&mut recorder, 0.0, 0.9, 440.0);
    rest(&mut recorder, 0.9, 1.1);
    sing(&mut recorder, 1.1, 1.6, 523.25);
    sing(&mut recorder, 1.6, 2.4, 784.0);
    recorder.stop_recording();

    println!("\nQuantized take:");
    print_take(recorder.store().notes());

    println!("\nShifting up an octave...");
    match recorder.store_mut().shift_octave(1) {
        Ok(()) => print_take(recorder.store().notes()),
        Err(e) => println!("  rejected: {e}"),
    }

    println!("\nSlowing down to 90 BPM...");
    recorder.change_bpm(90);
    print_take(recorder.store().notes());

    let melody = Melody::from_take("demo phrase", recorder.session().bpm(), recorder.store().notes());
    match save_demo_melody(&melody) {
        Ok(path) => println!("\nSaved demo melody under {path}"),
        Err(e) => eprintln!("\nCould not save demo melody: {e}"),
    }
}

fn sing(recorder: &mut MelodyRecorder, from_sec: f64, to_sec: f64, frequency_hz: f64) {
    let mut t = from_sec;
    while t < to_sec {
        recorder.process_frame(Frame::new(t, 0.6, Some(frequency_hz)));
        t += FRAME_STEP_SEC;
    }
}

fn rest(recorder: &mut MelodyRecorder, from_sec: f64, to_sec: f64) {
    let mut t = from_sec;
    while t < to_sec {
        recorder.process_frame(Frame::new(t, 0.0, None));
        t += FRAME_STEP_SEC;
    }
}

fn print_take(notes: &[Note]) {
    for note in notes {
        println!(
            "  {:<4} {:7.2} Hz  start {:.3}s  length {:.3}s",
            note.pitch_name, note.frequency_hz, note.start_time_sec, note.duration_sec
        );
    }
}

fn save_demo_melody(melody: &Melody) -> Result<String, voxroll::MelodyError> {
    let library = MelodyLibrary::at_default_location()?;
    let stored = library.save_melody(melody)?;
    Ok(format!(
        "{} (id {})",
        library.melodies_dir().display(),
        stored.id.unwrap_or_default()
    ))
}
