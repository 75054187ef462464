use serde::{Deserialize, Serialize};

use crate::domain::entities::client::Client;
use crate::domain::services::client_validation::ClientInput;
use crate::domain::value_objects::ids::ClientId;

/// Body of `POST /clients` and `PUT /clients/:id`.
///
/// Every field is optional at this layer so that missing values surface as
/// validation messages rather than as a malformed-body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    #[serde(alias = "id")]
    pub client_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub corporate_name: Option<String>,
    pub cuit: Option<String>,
    pub birthdate: Option<String>,
    pub cell_phone: Option<String>,
    pub email: Option<String>,
}

impl ClientRequest {
    /// Split into the body id and the fields to validate.
    pub fn into_parts(self) -> (Option<ClientId>, ClientInput) {
        let input = ClientInput {
            first_name: self.first_name,
            last_name: self.last_name,
            corporate_name: self.corporate_name,
            cuit: self.cuit,
            birthdate: self.birthdate,
            cell_phone: self.cell_phone,
            email: self.email,
        };
        (self.client_id.map(ClientId), input)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub client_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub corporate_name: String,
    pub cuit: String,
    pub birthdate: String,
    pub cell_phone: String,
    pub email: String,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        let birthdate = format!(
            "{:04}-{:02}-{:02}",
            client.birthdate.year(),
            u8::from(client.birthdate.month()),
            client.birthdate.day()
        );
        Self {
            client_id: client.id.0,
            first_name: client.first_name,
            last_name: client.last_name,
            corporate_name: client.corporate_name,
            cuit: client.cuit,
            birthdate,
            cell_phone: client.cell_phone,
            email: client.email,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}
