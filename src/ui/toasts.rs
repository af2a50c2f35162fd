use eframe::egui;
use std::time::{Duration, Instant};

const TOAST_LIFETIME: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created: Instant,
}

/// Short-lived notifications stacked in the bottom-right corner
#[derive(Debug, Default)]
pub struct Toasts {
    toasts: Vec<Toast>,
}

impl Toasts {
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message.into(), ToastKind::Info);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message.into(), ToastKind::Error);
    }

    fn push(&mut self, message: String, kind: ToastKind) {
        self.toasts.push(Toast {
            message,
            kind,
            created: Instant::now(),
        });
        if self.toasts.len() > MAX_TOASTS {
            self.toasts.remove(0);
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Drop toasts older than their lifetime as of `now`
    pub fn prune(&mut self, now: Instant) {
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created) < TOAST_LIFETIME);
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.prune(Instant::now());
        if self.toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -36.0))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    let (fill, text) = match toast.kind {
                        ToastKind::Info => (egui::Color32::from_gray(45), egui::Color32::WHITE),
                        ToastKind::Error => (
                            egui::Color32::from_rgb(90, 25, 25),
                            egui::Color32::from_rgb(255, 200, 200),
                        ),
                    };
                    egui::Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.label(egui::RichText::new(&toast.message).color(text));
                    });
                    ui.add_space(4.0);
                }
            });

        // Keep repainting so expired toasts disappear on time
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
