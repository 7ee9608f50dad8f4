use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EquipmentId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    Notebook,
    Tablet,
    Mouse,
    Keyboard,
    Monitor,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    Available,
    InUse,
    Maintenance,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub barcode: String,
    pub name: String,
    pub category: EquipmentCategory,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub status: EquipmentStatus,
    pub location: String,
}

impl Equipment {
    pub fn is_available(&self) -> bool {
        self.status == EquipmentStatus::Available
    }
}
