//! Emergency-contact directory.
//!
//! Contacts live in memory for the session only. Calls are not placed; a
//! `CallRequest` describes the call a dialler would make.

use serde::{Deserialize, Serialize};
use tracing::info;

use medminder_contracts::error::{MedMinderError, MedMinderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    #[default]
    Emergency,
    Doctor,
    Pharmacy,
}

impl std::str::FromStr for ContactKind {
    type Err = MedMinderError;

    fn from_str(s: &str) -> MedMinderResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "emergency" => Ok(ContactKind::Emergency),
            "doctor" => Ok(ContactKind::Doctor),
            "pharmacy" => Ok(ContactKind::Pharmacy),
            other => Err(MedMinderError::validation(
                "kind",
                format!("'{}' is not one of emergency, doctor, pharmacy", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub relationship: String,
    #[serde(rename = "type")]
    pub kind: ContactKind,
}

/// A national emergency line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmergencyService {
    pub number: &'static str,
    pub name: &'static str,
}

pub const EMERGENCY_SERVICES: [EmergencyService; 6] = [
    EmergencyService { number: "108", name: "Emergency Services (All India)" },
    EmergencyService { number: "100", name: "Police" },
    EmergencyService { number: "101", name: "Fire Brigade" },
    EmergencyService { number: "102", name: "Ambulance" },
    EmergencyService { number: "1097", name: "Women Helpline" },
    EmergencyService { number: "1950", name: "Poison Control" },
];

/// A call the UI would hand to the phone dialler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub name: String,
    pub phone: String,
}

impl CallRequest {
    pub fn describe(&self) -> String {
        format!("Initiating call to {} at {}", self.name, self.phone)
    }
}

/// Fields for a new contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
    pub kind: ContactKind,
}

#[derive(Debug, Clone)]
pub struct ContactDirectory {
    contacts: Vec<EmergencyContact>,
    next_id: u64,
}

impl Default for ContactDirectory {
    /// The stock directory: a family doctor, one personal emergency contact,
    /// and the local pharmacy.
    fn default() -> Self {
        let stock = [
            ("Dr. Sharma (Family Doctor)", "+91-98765-43210", "Primary Doctor", ContactKind::Doctor),
            ("Priya Patel", "+91-87654-32109", "Emergency Contact", ContactKind::Emergency),
            ("Apollo Pharmacy", "+91-76543-21098", "Local Pharmacy", ContactKind::Pharmacy),
        ];
        let contacts: Vec<EmergencyContact> = stock
            .into_iter()
            .zip(1..)
            .map(|((name, phone, relationship, kind), id)| EmergencyContact {
                id,
                name: name.to_string(),
                phone: phone.to_string(),
                relationship: relationship.to_string(),
                kind,
            })
            .collect();
        let next_id = contacts.len() as u64 + 1;
        Self { contacts, next_id }
    }
}

impl ContactDirectory {
    /// A directory with no contacts at all.
    pub fn empty() -> Self {
        Self {
            contacts: Vec::new(),
            next_id: 1,
        }
    }

    pub fn contacts(&self) -> &[EmergencyContact] {
        &self.contacts
    }

    /// Add a contact. Name and phone are required.
    pub fn add(&mut self, new: NewContact) -> MedMinderResult<&EmergencyContact> {
        if new.name.trim().is_empty() {
            return Err(MedMinderError::validation("name", "a contact name is required"));
        }
        if new.phone.trim().is_empty() {
            return Err(MedMinderError::validation("phone", "a phone number is required"));
        }

        let contact = EmergencyContact {
            id: self.next_id,
            name: new.name,
            phone: new.phone,
            relationship: new.relationship,
            kind: new.kind,
        };
        self.next_id += 1;

        info!(contact_id = contact.id, name = %contact.name, "emergency contact added");
        self.contacts.push(contact);
        Ok(&self.contacts[self.contacts.len() - 1])
    }

    /// Remove contact `id`. `false` if there was none.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.contacts.len();
        self.contacts.retain(|c| c.id != id);
        self.contacts.len() != before
    }

    pub fn call(&self, id: u64) -> Option<CallRequest> {
        self.contacts.iter().find(|c| c.id == id).map(|c| CallRequest {
            name: c.name.clone(),
            phone: c.phone.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directory_has_three_kinds() {
        let directory = ContactDirectory::default();
        let kinds: Vec<ContactKind> = directory.contacts().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ContactKind::Doctor, ContactKind::Emergency, ContactKind::Pharmacy]
        );
    }

    #[test]
    fn add_requires_name_and_phone() {
        let mut directory = ContactDirectory::empty();

        let err = directory
            .add(NewContact {
                phone: "112".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, MedMinderError::Validation { ref field, .. } if field == "name"));

        let err = directory
            .add(NewContact {
                name: "Neighbour".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, MedMinderError::Validation { ref field, .. } if field == "phone"));
        assert!(directory.contacts().is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut directory = ContactDirectory::default();
        assert!(directory.remove(3));
        assert!(!directory.remove(3));

        let added = directory
            .add(NewContact {
                name: "Neighbour".to_string(),
                phone: "+91-90000-11111".to_string(),
                relationship: "Neighbour".to_string(),
                kind: ContactKind::Emergency,
            })
            .unwrap();
        assert_eq!(added.id, 4);
    }

    #[test]
    fn call_describes_the_dial() {
        let directory = ContactDirectory::default();
        let call = directory.call(2).unwrap();
        assert_eq!(call.describe(), "Initiating call to Priya Patel at +91-87654-32109");
        assert!(directory.call(42).is_none());
    }

    #[test]
    fn emergency_numbers_include_all_india_line() {
        assert!(EMERGENCY_SERVICES.iter().any(|s| s.number == "108"));
    }
}
