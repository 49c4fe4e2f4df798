use notify_rust::Notification;

/// Desktop notification front end. Delivery failures are ignored: a missing
/// notification daemon must never fail a run.
#[derive(Debug, Clone)]
pub struct Notifier {
    enabled: bool,
}

impl Notifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn success(&self, body: &str) {
        self.show("LocalNote", body);
    }

    pub fn failure(&self, body: &str) {
        self.show("LocalNote Error", body);
    }

    fn show(&self, summary: &str, body: &str) {
        if !self.enabled {
            return;
        }

        let _ = Notification::new().summary(summary).body(body).show();
    }
}
