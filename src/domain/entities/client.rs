use crate::domain::value_objects::ids::ClientId;
use time::Date;

/// The mutable part of a client: everything except the store-assigned id.
///
/// A draft is only ever built by the validation layer, so holding one means
/// every field already passed the format rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDraft {
    pub first_name: String,
    pub last_name: String,
    pub corporate_name: String,
    pub cuit: String,
    pub birthdate: Date,
    pub cell_phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub corporate_name: String,
    pub cuit: String,
    pub birthdate: Date,
    pub cell_phone: String,
    pub email: String,
}

impl Client {
    pub fn from_draft(id: ClientId, draft: ClientDraft) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            corporate_name: draft.corporate_name,
            cuit: draft.cuit,
            birthdate: draft.birthdate,
            cell_phone: draft.cell_phone,
            email: draft.email,
        }
    }

    /// Overwrite every mutable field; the id is left untouched.
    pub fn apply(&mut self, draft: ClientDraft) {
        self.first_name = draft.first_name;
        self.last_name = draft.last_name;
        self.corporate_name = draft.corporate_name;
        self.cuit = draft.cuit;
        self.birthdate = draft.birthdate;
        self.cell_phone = draft.cell_phone;
        self.email = draft.email;
    }

    pub fn to_draft(&self) -> ClientDraft {
        ClientDraft {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            corporate_name: self.corporate_name.clone(),
            cuit: self.cuit.clone(),
            birthdate: self.birthdate,
            cell_phone: self.cell_phone.clone(),
            email: self.email.clone(),
        }
    }
}
