//! Simulated voice commands and spoken reminders.
//!
//! Speech recognition is faked by picking one of a handful of transcripts;
//! "speaking" returns the text that would be read aloud. Interpretation is a
//! substring match on the lowercased command.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use medminder_contracts::error::{MedMinderError, MedMinderResult};

/// Transcripts the fake recogniser can "hear".
pub const MOCK_TRANSCRIPTS: [&str; 5] = [
    "Set reminder for blood pressure medicine at 8 PM",
    "What are my medications for today?",
    "Read my health summary",
    "Cancel my next reminder",
    "How is my health streak?",
];

/// Pretend to listen and return what was "heard".
pub fn listen<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    MOCK_TRANSCRIPTS
        .choose(rng)
        .copied()
        .unwrap_or(MOCK_TRANSCRIPTS[0])
}

/// What a spoken command was understood as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceIntent {
    SetReminder,
    ListMedications,
    HealthSummary,
    NotUnderstood,
}

impl VoiceIntent {
    /// The sentence spoken back for this intent.
    pub fn response(self) -> &'static str {
        match self {
            VoiceIntent::SetReminder => "I've set your medication reminder for you.",
            VoiceIntent::ListMedications => {
                "Today you need to take Aspirin at 9 AM, Metformin at 12 PM, and Lisinopril at 6 PM."
            }
            VoiceIntent::HealthSummary => {
                "Your health stats look good. Blood pressure is 120 over 80, heart rate is 72 beats per minute, and you're on a 7-day streak!"
            }
            VoiceIntent::NotUnderstood => {
                "I'm sorry, I didn't understand that command. Please try again."
            }
        }
    }
}

/// Classify a command. Checked in order: reminder, medications, health.
pub fn interpret(command: &str) -> VoiceIntent {
    let command = command.to_lowercase();
    if command.contains("set reminder") {
        VoiceIntent::SetReminder
    } else if command.contains("medications") || command.contains("medicine") {
        VoiceIntent::ListMedications
    } else if command.contains("health") {
        VoiceIntent::HealthSummary
    } else {
        VoiceIntent::NotUnderstood
    }
}

/// A reminder read aloud at a time of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceReminder {
    /// "HH:MM".
    pub time: String,
    pub message: String,
    pub active: bool,
}

fn reminder(time: &str, message: &str, active: bool) -> VoiceReminder {
    VoiceReminder {
        time: time.to_string(),
        message: message.to_string(),
        active,
    }
}

/// Voice settings plus the reminder list.
#[derive(Debug, Clone)]
pub struct VoiceAssistant {
    enabled: bool,
    reminders: Vec<VoiceReminder>,
}

impl Default for VoiceAssistant {
    fn default() -> Self {
        Self::new(true)
    }
}

impl VoiceAssistant {
    /// Start with the four stock reminders.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            reminders: vec![
                reminder("09:00", "Time to take your morning Aspirin", true),
                reminder("12:00", "Remember to take Metformin with lunch", true),
                reminder("18:00", "Evening Lisinopril dose", true),
                reminder("21:00", "Check your blood pressure before bed", false),
            ],
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn reminders(&self) -> &[VoiceReminder] {
        &self.reminders
    }

    /// The text that would be spoken, or `None` while voice is disabled.
    pub fn speak<'a>(&self, text: &'a str) -> Option<&'a str> {
        if !self.enabled {
            debug!("voice disabled; response suppressed");
            return None;
        }
        Some(text)
    }

    /// Interpret `command` and speak the response.
    pub fn handle_command(&self, command: &str) -> (VoiceIntent, Option<&'static str>) {
        let intent = interpret(command);
        debug!(command = %command, intent = ?intent, "voice command interpreted");
        (intent, self.speak(intent.response()))
    }

    /// Add an active reminder. Both `time` and `message` are required.
    pub fn add_reminder(&mut self, time: &str, message: &str) -> MedMinderResult<&VoiceReminder> {
        if time.trim().is_empty() {
            return Err(MedMinderError::validation("time", "a reminder time is required"));
        }
        if message.trim().is_empty() {
            return Err(MedMinderError::validation("message", "a reminder message is required"));
        }
        self.reminders.push(reminder(time.trim(), message.trim(), true));
        Ok(&self.reminders[self.reminders.len() - 1])
    }

    /// Flip the reminder at `index`. Returns its new state, or `None` if the
    /// index is out of range.
    pub fn toggle_reminder(&mut self, index: usize) -> Option<bool> {
        let reminder = self.reminders.get_mut(index)?;
        reminder.active = !reminder.active;
        Some(reminder.active)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn commands_map_to_intents_in_order() {
        assert_eq!(
            interpret("Set reminder for blood pressure medicine at 8 PM"),
            VoiceIntent::SetReminder
        );
        assert_eq!(interpret("What are my medications for today?"), VoiceIntent::ListMedications);
        assert_eq!(interpret("Read my health summary"), VoiceIntent::HealthSummary);
        assert_eq!(interpret("Cancel my next reminder"), VoiceIntent::NotUnderstood);
    }

    #[test]
    fn listen_returns_a_known_transcript() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert!(MOCK_TRANSCRIPTS.contains(&listen(&mut rng)));
        }
    }

    #[test]
    fn disabled_voice_stays_silent() {
        let mut voice = VoiceAssistant::new(false);
        let (intent, spoken) = voice.handle_command("How is my health streak?");
        assert_eq!(intent, VoiceIntent::HealthSummary);
        assert!(spoken.is_none());

        voice.set_enabled(true);
        let (_, spoken) = voice.handle_command("How is my health streak?");
        assert!(spoken.unwrap().contains("7-day streak"));
    }

    #[test]
    fn adding_a_reminder_requires_time_and_message() {
        let mut voice = VoiceAssistant::default();
        assert!(voice.add_reminder("", "Drink water").is_err());
        assert!(voice.add_reminder("07:00", " ").is_err());
        assert_eq!(voice.reminders().len(), 4);

        let added = voice.add_reminder("07:00", "Drink water").unwrap();
        assert!(added.active);
        assert_eq!(voice.reminders().len(), 5);
    }

    #[test]
    fn toggle_flips_state_and_rejects_bad_index() {
        let mut voice = VoiceAssistant::default();
        assert_eq!(voice.toggle_reminder(3), Some(true));
        assert_eq!(voice.toggle_reminder(0), Some(false));
        assert_eq!(voice.toggle_reminder(99), None);
    }
}
