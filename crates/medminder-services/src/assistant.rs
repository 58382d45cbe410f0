//! Scripted health chat assistant.
//!
//! There is no model behind this: the lowercased question is scanned for
//! topic keywords (English and Hindi) in a fixed order, and the first topic
//! that matches selects a canned reply in the requested language.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medminder_contracts::error::{MedMinderError, MedMinderResult};

/// Reply language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl std::str::FromStr for Language {
    type Err = MedMinderError;

    fn from_str(s: &str) -> MedMinderResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "hi" | "hindi" => Ok(Language::Hi),
            other => Err(MedMinderError::validation(
                "language",
                format!("'{}' is not one of en, hi", other),
            )),
        }
    }
}

/// How the UI should badge a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    Suggestion,
    Warning,
    Info,
}

/// The topic a question was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Diabetes,
    Heart,
    Medication,
    Headache,
    Exercise,
    Diet,
    General,
}

/// Topics in match order, each with its English and Hindi triggers.
const TOPIC_KEYWORDS: [(Topic, &[&str]); 6] = [
    (
        Topic::Diabetes,
        &["diabetes", "blood sugar", "मधुमेह", "डायबिटीज", "शुगर"],
    ),
    (
        Topic::Heart,
        &["heart", "cardiac", "chest pain", "दिल", "हृदय", "हार्ट"],
    ),
    (
        Topic::Medication,
        &["medication", "pill", "medicine", "दवा", "दवाई", "गोली"],
    ),
    (Topic::Headache, &["headache", "migraine", "सिरदर्द", "सिर दर्द"]),
    (
        Topic::Exercise,
        &["exercise", "workout", "व्यायाम", "कसरत", "एक्सरसाइज"],
    ),
    (
        Topic::Diet,
        &["diet", "nutrition", "food", "आहार", "खाना", "डाइट"],
    ),
];

/// Route a question to a topic. Falls back to `General`.
pub fn detect_topic(question: &str) -> Topic {
    let input = question.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| input.contains(k)))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::General)
}

/// A canned answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub topic: Topic,
    pub kind: ReplyKind,
    pub text: &'static str,
}

/// Answer `question` in `language`.
pub fn respond(question: &str, language: Language) -> Reply {
    let topic = detect_topic(question);
    let (kind, text) = canned_reply(topic, language);
    Reply { topic, kind, text }
}

fn canned_reply(topic: Topic, language: Language) -> (ReplyKind, &'static str) {
    use Language::{En, Hi};

    match (topic, language) {
        (Topic::Diabetes, En) => (
            ReplyKind::Suggestion,
            "For diabetes management: 📊 Monitor your blood sugar regularly, 💊 take medications as prescribed, 🥗 maintain a balanced diet with controlled carbs, and 🚶‍♂️ exercise regularly. Would you like specific meal suggestions or exercise routines?",
        ),
        (Topic::Diabetes, Hi) => (
            ReplyKind::Suggestion,
            "मधुमेह प्रबंधन के लिए: 📊 नियमित रूप से ब्लड शुगर चेक करें, 💊 डॉक्टर की सलाह के अनुसार दवाएं लें, 🥗 संतुलित आहार लें और कार्बोहाइड्रेट कम करें, और 🚶‍♂️ नियमित व्यायाम करें। क्या आपको विशिष्ट भोजन या व्यायाम सुझाव चाहिए?",
        ),
        (Topic::Heart, En) => (
            ReplyKind::Warning,
            "⚠️ For heart-related concerns: Take prescribed medications on time, avoid excessive salt, exercise moderately, and manage stress. If you're experiencing chest pain, shortness of breath, or unusual symptoms, seek immediate medical attention!",
        ),
        (Topic::Heart, Hi) => (
            ReplyKind::Warning,
            "⚠️ हृदय संबंधी समस्याओं के लिए: समय पर दवाएं लें, अधिक नमक से बचें, मध्यम व्यायाम करें, और तनाव को नियंत्रित करें। यदि आपको सीने में दर्द, सांस लेने में कठिनाई या असामान्य लक्षण हैं, तुरंत चिकित्सा सहायता लें!",
        ),
        (Topic::Medication, En) => (
            ReplyKind::Info,
            "Medication reminders: 📅 Set consistent daily schedules, 📱 use apps like this one, 💊 organize pills in weekly containers, and 📝 keep a medication diary. Never skip doses without consulting your doctor!",
        ),
        (Topic::Medication, Hi) => (
            ReplyKind::Info,
            "दवा रिमाइंडर: 📅 नियमित दैनिक समय निर्धारित करें, 📱 इस जैसे ऐप्स का उपयोग करें, 💊 साप्ताहिक गोली बॉक्स में व्यवस्थित करें, और 📝 दवा डायरी रखें। डॉक्टर की सलाह के बिना कभी भी खुराक न छोड़ें!",
        ),
        (Topic::Headache, En) => (
            ReplyKind::Suggestion,
            "For headache relief: 💧 Stay hydrated, 😴 ensure adequate sleep, 🧘‍♀️ practice relaxation techniques, and 💊 take pain relievers as needed. Track triggers like stress, certain foods, or lack of sleep.",
        ),
        (Topic::Headache, Hi) => (
            ReplyKind::Suggestion,
            "सिरदर्द से राहत के लिए: 💧 पर्याप्त पानी पिएं, 😴 पर्याप्त नींद लें, 🧘‍♀️ विश्राम तकनीकों का अभ्यास करें, और 💊 आवश्यकता के अनुसार दर्द निवारक लें। तनाव, कुछ खाद्य पदार्थ या नींद की कमी जैसे कारकों को ट्रैक करें।",
        ),
        (Topic::Exercise, En) => (
            ReplyKind::Suggestion,
            "🏃‍♂️ Safe exercise tips: Start slowly, listen to your body, stay hydrated, and consult your doctor about exercise limitations. Activities like walking, swimming, and gentle yoga are often great starting points!",
        ),
        (Topic::Exercise, Hi) => (
            ReplyKind::Suggestion,
            "🏃‍♂️ सुरक्षित व्यायाम सुझाव: धीरे-धीरे शुरू करें, अपने शरीर की सुनें, हाइड्रेटेड रहें, और व्यायाम सीमाओं के बारे में डॉक्टर से सलाह लें। चलना, तैराकी और हल्का योग अक्सर बेहतरीन शुरुआती गतिविधियां हैं!",
        ),
        (Topic::Diet, En) => (
            ReplyKind::Suggestion,
            "🥗 Nutrition advice: Focus on whole foods, plenty of vegetables, lean proteins, and whole grains. Limit processed foods, excessive sugar, and sodium. Consider consulting a nutritionist for personalized meal plans!",
        ),
        (Topic::Diet, Hi) => (
            ReplyKind::Suggestion,
            "🥗 पोषण सलाह: संपूर्ण खाद्य पदार्थों, सब्जियों, दुबला प्रोटीन और साबुत अनाज पर ध्यान दें। प्रसंस्कृत खाद्य पदार्थ, अधिक चीनी और नमक से बचें। व्यक्तिगत भोजन योजना के लिए पोषण विशेषज्ञ से सलाह लें!",
        ),
        (Topic::General, En) => (
            ReplyKind::Info,
            "I'm here to help with health-related questions! I can provide information about medications, symptoms, diet, exercise, and general wellness. What specific health topic would you like to discuss?",
        ),
        (Topic::General, Hi) => (
            ReplyKind::Info,
            "मैं स्वास्थ्य संबंधी प्रश्नों में आपकी सहायता के लिए यहां हूं! मैं दवाओं, लक्षणों, आहार, व्यायाम और सामान्य कल्याण के बारे में जानकारी प्रदान कर सकता हूं। आप किस विशिष्ट स्वास्थ्य विषय पर चर्चा करना चाहते हैं?",
        ),
    }
}

const GREETING: &str = "Hello! I'm your AI Health Assistant. I can help you with medication reminders, health tips, and answer questions about your conditions. How can I assist you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One line of a chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 1-based position in the transcript.
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Set on assistant replies only.
    pub kind: Option<ReplyKind>,
    pub language: Language,
}

/// A chat transcript that opens with the assistant's greeting.
#[derive(Debug, Clone)]
pub struct ChatSession {
    language: Language,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(language: Language, now: DateTime<Utc>) -> Self {
        let greeting = ChatMessage {
            id: 1,
            text: GREETING.to_string(),
            sender: Sender::Assistant,
            timestamp: now,
            kind: Some(ReplyKind::Info),
            language: Language::En,
        };
        Self {
            language,
            messages: vec![greeting],
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Later replies use `language`; earlier messages keep theirs.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append the user's question and the assistant's reply.
    ///
    /// Blank input is ignored and returns `None`; otherwise returns the
    /// reply message.
    pub fn send(&mut self, text: &str, now: DateTime<Utc>) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        let reply = respond(text, self.language);
        let next_id = self.messages.len() as u64 + 1;

        self.messages.push(ChatMessage {
            id: next_id,
            text: text.to_string(),
            sender: Sender::User,
            timestamp: now,
            kind: None,
            language: self.language,
        });
        self.messages.push(ChatMessage {
            id: next_id + 1,
            text: reply.text.to_string(),
            sender: Sender::Assistant,
            timestamp: now,
            kind: Some(reply.kind),
            language: self.language,
        });

        self.messages.last()
    }
}
