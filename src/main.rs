#[cfg(feature = "gui")]
use eframe::egui;

#[cfg(feature = "gui")]
use rondo::{
    generate, midi_note_name, AudioOutput, GenParams, MidiOutputDevice, PlaybackEngine,
    PlaybackEvent, Sequencer, MAX_STEPS, MIN_STEPS,
};

#[cfg(feature = "gui")]
fn main() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([700.0, 780.0])
            .with_title("RONDO - Circle Sequencer"),
        ..Default::default()
    };

    eframe::run_native(
        "RONDO",
        options,
        Box::new(|_cc| Ok(Box::new(RondoApp::new()))),
    )
}

#[cfg(not(feature = "gui"))]
fn main() {
    eprintln!("This binary requires the 'gui' feature to be enabled");
    std::process::exit(1);
}

#[cfg(feature = "gui")]
struct RondoApp {
    sequencer: Sequencer,
    audio_output: AudioOutput,
    midi_output: MidiOutputDevice,
    playback_engine: PlaybackEngine,
    params: GenParams,

    // UI state
    available_midi_ports: Vec<String>,
    selected_port: Option<usize>,
    current_visual_step: usize,
    last_error: Option<String>,
}

#[cfg(feature = "gui")]
impl RondoApp {
    fn new() -> Self {
        let params = GenParams::default();

        Self {
            sequencer: Sequencer::new(params.steps),
            audio_output: AudioOutput::default(),
            midi_output: MidiOutputDevice::new(),
            playback_engine: PlaybackEngine::new(),
            params,
            available_midi_ports: MidiOutputDevice::available_ports(),
            selected_port: None,
            current_visual_step: 0,
            last_error: None,
        }
    }

    fn handle_playback_events(&mut self) {
        for event in self.playback_engine.poll_events() {
            match event {
                PlaybackEvent::StepAdvanced(step) => {
                    self.current_visual_step = step;
                    self.sequencer.set_current_step(step);
                }
                PlaybackEvent::Clock => {
                    let _ = self.midi_output.send_clock();
                }
                PlaybackEvent::NoteOn(note, velocity) => {
                    self.audio_output.trigger_note(note);
                    let _ = self.midi_output.send_note_on(note, velocity);
                }
                PlaybackEvent::NoteOff(note) => {
                    let _ = self.midi_output.send_note_off(note);
                }
            }
        }
    }

    fn start_playback(&mut self) {
        let _ = self.midi_output.send_start();
        self.playback_engine.start(
            self.sequencer.bpm(),
            self.sequencer.shared().clone(),
            self.sequencer.note(),
        );
    }

    fn stop_playback(&mut self) {
        self.playback_engine.stop();
        self.audio_output.silence();
        let _ = self.midi_output.send_note_off(self.sequencer.note());
        let _ = self.midi_output.send_stop();
    }

    fn generate_pattern(&mut self) {
        match generate(&self.params, &mut rand::rng()) {
            Ok(steps) => {
                self.sequencer.install(steps);
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    fn apply_ring_size(&mut self) {
        match self.sequencer.resize(self.params.steps) {
            Ok(_) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    fn reset_ring(&mut self) {
        self.sequencer.clear();
        let _ = self.sequencer.resize(self.params.steps);
        self.last_error = None;
    }

    fn midi_port_row(&mut self, ui: &mut egui::Ui) {
        let mut picked = None;
        ui.horizontal(|ui| {
            ui.label("MIDI Output:");
            if self.available_midi_ports.is_empty() {
                ui.label("No MIDI ports available");
                return;
            }
            let current = self
                .selected_port
                .map(|i| self.available_midi_ports[i].as_str())
                .unwrap_or("Select port...");
            egui::ComboBox::from_label("").selected_text(current).show_ui(ui, |ui| {
                for (i, port_name) in self.available_midi_ports.iter().enumerate() {
                    if ui
                        .selectable_label(self.selected_port == Some(i), port_name)
                        .clicked()
                    {
                        picked = Some(i);
                    }
                }
            });
        });

        if let Some(port_idx) = picked {
            if self.midi_output.connect(port_idx).is_ok() {
                self.selected_port = Some(port_idx);
            }
        }
    }

    fn transport_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.playback_engine.is_running() {
                if ui.button("⏸ Stop").clicked() {
                    self.stop_playback();
                }
            } else if ui.button("▶ Play").clicked() {
                self.start_playback();
            }

            ui.add_space(20.0);

            ui.label("BPM:");
            let mut bpm = self.sequencer.bpm();
            if ui
                .add(egui::Slider::new(&mut bpm, 40.0..=240.0).step_by(1.0))
                .changed()
            {
                self.sequencer.set_bpm(bpm);
            }

            ui.add_space(20.0);

            ui.label("Note:");
            let mut note = self.sequencer.note();
            if ui
                .add(egui::Slider::new(&mut note, 0..=127).step_by(1.0))
                .changed()
            {
                self.sequencer.set_note(note);
            }
            ui.label(format!("({})", midi_note_name(note)));
        });
    }

    fn generator_rows(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Steps:");
            ui.add(egui::DragValue::new(&mut self.params.steps).range(MIN_STEPS..=MAX_STEPS));
            ui.label("Max rest run:");
            ui.add(egui::DragValue::new(&mut self.params.max_rest_run).range(0..=MAX_STEPS));
            ui.label("Max beat run:");
            ui.add(egui::DragValue::new(&mut self.params.max_active_run).range(0..=MAX_STEPS));
            ui.checkbox(&mut self.params.allow_gap_axis, "Loose axis");
        });

        ui.horizontal(|ui| {
            if ui.button("Generate").clicked() {
                self.generate_pattern();
            }
            if ui.button("Apply size").clicked() {
                self.apply_ring_size();
            }
            if ui.button("Reset").clicked() {
                self.reset_ring();
            }

            ui.add_space(20.0);

            if ui.button("⟲").clicked() {
                self.sequencer.rotate(-1);
            }
            if ui.button("⟳").clicked() {
                self.sequencer.rotate(1);
            }
            ui.label(format!("first step: {}", self.sequencer.first_step()));
        });

        if let Some(err) = &self.last_error {
            ui.colored_label(egui::Color32::RED, err);
        }
    }

    fn draw_ring(&mut self, ui: &mut egui::Ui) {
        let side = ui.available_width().min(480.0);
        let (response, painter) =
            ui.allocate_painter(egui::Vec2::splat(side), egui::Sense::click());
        let center = response.rect.center();

        let count = self.sequencer.ring().len();
        if count == 0 {
            return;
        }

        let step_radius = (side / count as f32).clamp(6.0, 18.0);
        let orbit = side / 2.0 - step_radius - 8.0;
        let is_playing = self.playback_engine.is_running();

        let mut clicked_slot = None;
        let pointer = response.interact_pointer_pos();

        for slot in 0..count {
            let angle = slot as f32 / count as f32 * std::f32::consts::TAU
                - std::f32::consts::FRAC_PI_2;
            let pos = center + egui::Vec2::new(angle.cos(), angle.sin()) * orbit;

            let active = self.sequencer.ring().get(self.sequencer.ring_index(slot));
            let is_current = is_playing && self.current_visual_step == slot;

            let fill = if is_current {
                egui::Color32::from_rgb(100, 200, 100)
            } else if active {
                egui::Color32::from_rgb(60, 60, 200)
            } else {
                egui::Color32::from_rgb(40, 40, 40)
            };

            painter.circle_filled(pos, step_radius, fill);
            if slot == 0 {
                // Mark the first slot of the cycle.
                painter.circle_stroke(
                    pos,
                    step_radius + 2.0,
                    egui::Stroke::new(1.5, egui::Color32::GRAY),
                );
            }

            if response.clicked() {
                if let Some(click) = pointer {
                    if click.distance(pos) <= step_radius {
                        clicked_slot = Some(slot);
                    }
                }
            }
        }

        if let Some(slot) = clicked_slot {
            self.sequencer.toggle(slot);
        }
    }
}

#[cfg(feature = "gui")]
impl eframe::App for RondoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        self.handle_playback_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("RONDO - Circle Sequencer");
            ui.add_space(10.0);

            self.midi_port_row(ui);
            ui.add_space(10.0);
            self.transport_row(ui);
            ui.add_space(10.0);
            self.generator_rows(ui);
            ui.add_space(10.0);
            self.draw_ring(ui);

            ui.separator();
            ui.label("Click a step to toggle it; generated patterns mirror across the ring");
            if !self.midi_output.is_connected() {
                ui.colored_label(
                    egui::Color32::YELLOW,
                    "⚠ No MIDI output connected - audio click only",
                );
            }
        });
    }
}
