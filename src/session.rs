/// Announcement emitted when a step becomes current.
pub const STEP_ANNOUNCEMENT: &str = "[<step>] <description> (type: <type>, default: <value>)";

/// Announcement emitted by the terminal step.
pub const SETUP_FINISHED: &str = "All values collected for <target>";

/// Interactive user handle the wizard announces to. Templates are opaque
/// strings with `<name>` placeholders; the session decides how to render
/// them.
pub trait Session {
    fn send_message(&mut self, template: &str, slots: &[(&str, String)]);
}

/// Substitutes `<name>` placeholders from the slot list.
pub fn render_template(template: &str, slots: &[(&str, String)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in slots {
        rendered = rendered.replace(&format!("<{}>", name), value);
    }
    rendered
}

/// Session that buffers rendered messages for the TUI (and tests) to read.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }
}

impl Session for MessageLog {
    fn send_message(&mut self, template: &str, slots: &[(&str, String)]) {
        self.messages.push(render_template(template, slots));
    }
}
