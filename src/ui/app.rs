use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::NaiveDateTime;
use eframe::egui::{self, Color32, Rect, RichText, ScrollArea, TextEdit, Ui};

use timepicker::entry::{ClockConvention, EntryEvent, TimeEntrySession, Validity, ValueChange};

const VALID_TEXT: Color32 = Color32::from_rgb(104, 218, 131);
const INVALID_TEXT: Color32 = Color32::from_rgb(255, 106, 106);
const MUTED_TEXT: Color32 = Color32::from_rgb(161, 180, 201);

pub fn run_gui(session: TimeEntrySession) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Time Picker")
            .with_inner_size([420.0, 480.0])
            .with_min_inner_size([320.0, 360.0]),
        ..Default::default()
    };

    let app = TimePickerApp::new(session);

    eframe::run_native(
        "Time Picker",
        native_options,
        Box::new(move |cc| {
            configure_theme(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to launch time picker GUI: {err}"))?;

    Ok(())
}

fn configure_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.override_text_color = Some(Color32::from_rgb(226, 234, 246));
    visuals.panel_fill = Color32::from_rgb(8, 16, 26);
    visuals.window_fill = Color32::from_rgb(12, 20, 32);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(16, 24, 38);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(26, 42, 62);
    visuals.widgets.active.bg_fill = Color32::from_rgb(34, 60, 88);
    visuals.selection.bg_fill = Color32::from_rgb(43, 148, 178);
    ctx.set_visuals(visuals);
}

/// Demo host: owns the committed value and feeds pointer/focus events to the
/// session the way a form would.
struct TimePickerApp {
    session: TimeEntrySession,
    value: Option<NaiveDateTime>,
    picker_rect: Option<Rect>,
    drop_down_rect: Option<Rect>,
    status_message: Option<(String, Instant)>,
}

impl TimePickerApp {
    fn new(session: TimeEntrySession) -> Self {
        let value = session.value();
        Self {
            session,
            value,
            picker_rect: None,
            drop_down_rect: None,
            status_message: None,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, ttl: Duration) {
        self.status_message = Some((text.into(), Instant::now() + ttl));
    }

    fn dispatch(&mut self, event: EntryEvent) {
        if let Some(ValueChange { value }) = self.session.apply(event) {
            self.value = value;
            self.session.set_value(value);
            let text = value.map_or_else(
                || "cleared".to_string(),
                |value| self.session.format(value),
            );
            self.set_status(format!("Committed {text}"), Duration::from_secs(3));
        }
    }

    fn show_picker(&mut self, ui: &mut Ui) {
        let pointer = ui.ctx().pointer_interact_pos();
        let pressed = ui.ctx().input(|input| input.pointer.any_pressed());
        let pointer_in_drop_down = self
            .drop_down_rect
            .zip(pointer)
            .is_some_and(|(rect, pos)| rect.contains(pos));

        let text_color = match self.session.validity() {
            Validity::Valid => Some(VALID_TEXT),
            Validity::Invalid => Some(INVALID_TEXT),
            Validity::Neutral => None,
        };
        let placeholder = self.session.placeholder();
        let mut buffer = self.session.display_text().to_string();
        let mut typed = false;
        let mut lost_focus = false;
        let mut affordance_clicked = false;

        let input_rect = ui
            .horizontal(|ui| {
                let mut edit = TextEdit::singleline(&mut buffer)
                    .hint_text(placeholder)
                    .desired_width(180.0);
                if let Some(color) = text_color {
                    edit = edit.text_color(color);
                }
                let response = ui.add(edit);
                typed = response.changed();
                lost_focus = response.lost_focus();
                if ui.button("Clock").clicked() {
                    affordance_clicked = true;
                    response.request_focus();
                }
            })
            .response
            .rect;

        if typed {
            self.dispatch(EntryEvent::RawInput(buffer));
        }
        if affordance_clicked {
            self.dispatch(EntryEvent::FocusAffordance);
        }
        // The list is part of the input: pressing on it must not read as a blur.
        if lost_focus && !pointer_in_drop_down {
            self.dispatch(EntryEvent::Blur);
        }

        let mut picked = None;
        self.drop_down_rect = None;
        if self.session.is_drop_down_visible() {
            let suggestions = self.session.suggestions();
            let frame = egui::Frame::group(ui.style()).show(ui, |ui| {
                ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                    for candidate in suggestions {
                        let label = self.session.format(candidate);
                        if ui.selectable_label(false, label).clicked() {
                            picked = Some(candidate);
                        }
                    }
                });
            });
            self.drop_down_rect = Some(frame.response.rect);
        }
        if let Some(candidate) = picked {
            self.dispatch(EntryEvent::PickSuggestion(candidate));
        }

        let picker_rect = self
            .drop_down_rect
            .map_or(input_rect, |rect| input_rect.union(rect));
        let pressed_outside = pressed
            && self
                .picker_rect
                .zip(pointer)
                .is_some_and(|(rect, pos)| !rect.contains(pos));
        if pressed_outside && self.session.is_drop_down_visible() {
            self.dispatch(EntryEvent::ClickOutside);
        }
        self.picker_rect = Some(picker_rect);
    }

    fn show_settings(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label("Clock");
            let mut convention = self.session.settings().convention;
            let twelve = ui.radio_value(&mut convention, ClockConvention::Hour12, "12h");
            let twenty_four = ui.radio_value(&mut convention, ClockConvention::Hour24, "24h");
            if twelve.changed() || twenty_four.changed() {
                self.session.set_convention(convention);
            }
        });

        let settings = self.session.settings();
        let range = self.session.range();
        let bound = |value: Option<NaiveDateTime>, fallback: &str| {
            value.map_or_else(|| fallback.to_string(), |value| self.session.format(value))
        };
        let span = settings
            .options
            .max_span_hours
            .map_or_else(String::new, |hours| format!(", at most {hours} h ahead"));
        ui.label(
            RichText::new(format!(
                "Range {} - {} | every {} min{}",
                bound(range.min, "start of day"),
                bound(range.max, "end of day"),
                settings.options.interval_minutes,
                span
            ))
            .color(MUTED_TEXT),
        );
    }
}

impl eframe::App for TimePickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some((_, expires_at)) = &self.status_message
            && Instant::now() >= *expires_at
        {
            self.status_message = None;
        }

        egui::TopBottomPanel::bottom("footer")
            .resizable(false)
            .show(ctx, |ui| {
                let status = match &self.status_message {
                    Some((text, _)) => text.as_str(),
                    None => "Type digits such as 945a, then tab away or pick a time.",
                };
                ui.label(RichText::new(status).color(MUTED_TEXT));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(
                RichText::new("Time Entry")
                    .color(Color32::from_rgb(104, 221, 205))
                    .strong(),
            );
            ui.separator();
            self.show_settings(ui);
            ui.add_space(8.0);
            self.show_picker(ui);
            ui.add_space(12.0);
            ui.separator();
            let value_text = self.value.map_or_else(
                || "-".to_string(),
                |value| value.format("%Y-%m-%d %H:%M:%S").to_string(),
            );
            ui.label(RichText::new(format!("Value: {value_text}")).monospace());
        });

        // Keeps the placeholder clock current.
        ctx.request_repaint_after(Duration::from_secs(1));
    }
}
