//! Form state and actions for the machine editor.
//!
//! # Responsibility
//! - Hold the editable form fields (`id` read-only, `name`, `line`, `status`).
//! - Turn Create/Update/Delete/Select/Clear actions into service calls.
//! - Collapse every outcome into one `ActionResponse` message.
//!
//! # Invariants
//! - A failed action leaves the form fields as they were.
//! - Update and Delete without a loaded id never reach the service.
//! - Delete runs only after the confirmation callback agrees.

use machinedesk_core::{Machine, MachineId, MachineService, MachineStatus};

/// Outcome of one form action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the action succeeded.
    pub ok: bool,
    /// Machine the action applied to, when known.
    pub machine_id: Option<MachineId>,
    /// Human-readable message for the user.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, machine_id: MachineId) -> Self {
        Self {
            ok: true,
            machine_id: Some(machine_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            machine_id: None,
            message: message.into(),
        }
    }
}

/// Editable machine form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineForm {
    id: Option<MachineId>,
    pub name: String,
    pub line: String,
    pub status: String,
}

impl Default for MachineForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            line: String::new(),
            status: MachineStatus::default().as_str().to_string(),
        }
    }
}

impl MachineForm {
    /// Id of the loaded machine; `None` for a fresh form.
    pub fn id(&self) -> Option<MachineId> {
        self.id
    }

    /// Resets every field; status goes back to `operational`.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Copies a machine into the form.
    pub fn load(&mut self, machine: &Machine) {
        self.id = Some(machine.id);
        self.name = machine.name.clone();
        self.line = machine.line.clone();
        self.status = machine.status.as_str().to_string();
    }

    /// Loads machine `id` as if its row was selected in the list.
    pub fn select(&mut self, service: &MachineService, id: MachineId) -> ActionResponse {
        match service.get_machine(id) {
            Ok(Some(machine)) => {
                self.load(&machine);
                ActionResponse::success("Machine loaded.", id)
            }
            Ok(None) => ActionResponse::failure("Machine not found."),
            Err(err) => ActionResponse::failure(err.to_string()),
        }
    }

    /// Creates a machine from the form fields and keeps the new id.
    pub fn create(&mut self, service: &MachineService) -> ActionResponse {
        match service.create_machine(&self.name, &self.line, &self.status) {
            Ok(id) => {
                self.id = Some(id);
                ActionResponse::success(format!("Machine created (id={id})."), id)
            }
            Err(err) => ActionResponse::failure(err.to_string()),
        }
    }

    /// Saves the form fields over the loaded machine.
    pub fn update(&mut self, service: &MachineService) -> ActionResponse {
        let Some(id) = self.id else {
            return ActionResponse::failure("Select a machine first.");
        };

        match service.update_machine(id, &self.name, &self.line, &self.status) {
            Ok(()) => ActionResponse::success("Machine updated.", id),
            Err(err) => ActionResponse::failure(err.to_string()),
        }
    }

    /// Deletes the loaded machine once `confirm` returns `true`, then clears
    /// the form.
    pub fn delete(
        &mut self,
        service: &MachineService,
        confirm: impl FnOnce() -> bool,
    ) -> ActionResponse {
        let Some(id) = self.id else {
            return ActionResponse::failure("Select a machine first.");
        };
        if !confirm() {
            return ActionResponse::failure("Delete cancelled.");
        }

        match service.delete_machine(id) {
            Ok(()) => {
                self.clear();
                ActionResponse::success("Machine deleted.", id)
            }
            Err(err) => ActionResponse::failure(err.to_string()),
        }
    }
}
