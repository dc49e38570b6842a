//! Built-in endpoint set for the SITPORT users API.

use super::types::EndpointDescriptor;

/// Base URL of the SITPORT users API.
pub const DEFAULT_BASE_URL: &str = "https://orion.directemar.cl/sitport/back/users";

/// Returns the built-in endpoint list, in fetch order.
pub fn default_endpoints() -> Vec<EndpointDescriptor> {
    vec![
        EndpointDescriptor::post("consultaRestricciones"),
        EndpointDescriptor::post("consultaBahias"),
        EndpointDescriptor::post("consultaZonas"),
        EndpointDescriptor::post("consultareparzona"),
        EndpointDescriptor::post("consultaCapuertoRestriccion"),
        EndpointDescriptor::get("Totalpronostico"),
        EndpointDescriptor::get("Totalgeneral"),
    ]
}
