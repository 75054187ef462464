use crate::domain::entities::client::{Client, ClientDraft};
use crate::domain::value_objects::ids::ClientId;
use time::Date;

/// A persisted `clients` row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ClientRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub corporate_name: String,
    pub cuit: String,
    pub birthdate: Date,
    pub cell_phone: String,
    pub email: String,
}

/// Column values for an insert; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClientRow {
    pub first_name: String,
    pub last_name: String,
    pub corporate_name: String,
    pub cuit: String,
    pub birthdate: Date,
    pub cell_phone: String,
    pub email: String,
}

impl ClientRow {
    pub fn from_client(client: &Client) -> Self {
        Self {
            id: client.id.0,
            first_name: client.first_name.clone(),
            last_name: client.last_name.clone(),
            corporate_name: client.corporate_name.clone(),
            cuit: client.cuit.clone(),
            birthdate: client.birthdate,
            cell_phone: client.cell_phone.clone(),
            email: client.email.clone(),
        }
    }

    pub fn into_client(self) -> Client {
        Client {
            id: ClientId(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            corporate_name: self.corporate_name,
            cuit: self.cuit,
            birthdate: self.birthdate,
            cell_phone: self.cell_phone,
            email: self.email,
        }
    }
}

impl NewClientRow {
    pub fn from_draft(draft: &ClientDraft) -> Self {
        Self {
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            corporate_name: draft.corporate_name.clone(),
            cuit: draft.cuit.clone(),
            birthdate: draft.birthdate,
            cell_phone: draft.cell_phone.clone(),
            email: draft.email.clone(),
        }
    }

    /// Attach a store-assigned id.
    pub fn with_id(self, id: i32) -> ClientRow {
        ClientRow {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            corporate_name: self.corporate_name,
            cuit: self.cuit,
            birthdate: self.birthdate,
            cell_phone: self.cell_phone,
            email: self.email,
        }
    }
}
