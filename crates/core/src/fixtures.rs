use chrono::NaiveDate;

use crate::domain::equipment::{Equipment, EquipmentCategory, EquipmentId, EquipmentStatus};
use crate::domain::loan::{Loan, LoanId};
use crate::errors::DomainError;
use crate::inventory::Inventory;

use EquipmentCategory::{Keyboard, Monitor, Mouse, Notebook, Tablet};
use EquipmentStatus::{Available, InUse};

struct SeedEquipment {
    id: &'static str,
    barcode: &'static str,
    name: &'static str,
    category: EquipmentCategory,
    brand: &'static str,
    model: &'static str,
    serial_number: &'static str,
    status: EquipmentStatus,
    location: &'static str,
}

struct SeedLoan {
    id: &'static str,
    equipment_id: &'static str,
    borrower_name: &'static str,
    borrower_email: &'static str,
    department: &'static str,
    loan_date: (i32, u32, u32),
    expected_return_date: (i32, u32, u32),
    actual_return_date: Option<(i32, u32, u32)>,
}

const STOCKROOM_A: &str = "Almoxarifado - Setor A";
const STOCKROOM_B: &str = "Almoxarifado - Setor B";

/// Demo stockroom: 24 items, 18 available, 6 out on loan, 2 of them overdue on the reference date.
const SEED_EQUIPMENT: &[SeedEquipment] = &[
    SeedEquipment {
        id: "NB-001",
        barcode: "1234567890",
        name: "Notebook Dell Latitude 5520",
        category: Notebook,
        brand: "Dell",
        model: "Latitude 5520",
        serial_number: "DL5520-001",
        status: InUse,
        location: "João Silva - Setor TI",
    },
    SeedEquipment {
        id: "NB-002",
        barcode: "1111222233",
        name: "Notebook HP EliteBook 840",
        category: Notebook,
        brand: "HP",
        model: "EliteBook 840",
        serial_number: "HP-EB840-004",
        status: InUse,
        location: "Ana Costa - Financeiro",
    },
    SeedEquipment {
        id: "NB-003",
        barcode: "1111222244",
        name: "Notebook Lenovo ThinkPad T14",
        category: Notebook,
        brand: "Lenovo",
        model: "ThinkPad T14",
        serial_number: "LN-T14-006",
        status: InUse,
        location: "Rafaela Souza - RH",
    },
    SeedEquipment {
        id: "NB-004",
        barcode: "1111222255",
        name: "Notebook Dell Latitude 5520",
        category: Notebook,
        brand: "Dell",
        model: "Latitude 5520",
        serial_number: "DL5520-007",
        status: Available,
        location: STOCKROOM_A,
    },
    SeedEquipment {
        id: "NB-005",
        barcode: "1111222266",
        name: "Notebook Dell Latitude 5520",
        category: Notebook,
        brand: "Dell",
        model: "Latitude 5520",
        serial_number: "DL5520-008",
        status: Available,
        location: STOCKROOM_A,
    },
    SeedEquipment {
        id: "NB-006",
        barcode: "1111222277",
        name: "Notebook HP EliteBook 840",
        category: Notebook,
        brand: "HP",
        model: "EliteBook 840",
        serial_number: "HP-EB840-009",
        status: Available,
        location: STOCKROOM_A,
    },
    SeedEquipment {
        id: "NB-007",
        barcode: "1111222288",
        name: "Notebook HP EliteBook 840",
        category: Notebook,
        brand: "HP",
        model: "EliteBook 840",
        serial_number: "HP-EB840-010",
        status: Available,
        location: STOCKROOM_A,
    },
    SeedEquipment {
        id: "NB-008",
        barcode: "1111222299",
        name: "Notebook Lenovo ThinkPad T14",
        category: Notebook,
        brand: "Lenovo",
        model: "ThinkPad T14",
        serial_number: "LN-T14-011",
        status: Available,
        location: STOCKROOM_A,
    },
    SeedEquipment {
        id: "NB-009",
        barcode: "1111222300",
        name: "Notebook Lenovo ThinkPad T14",
        category: Notebook,
        brand: "Lenovo",
        model: "ThinkPad T14",
        serial_number: "LN-T14-012",
        status: Available,
        location: STOCKROOM_A,
    },
    SeedEquipment {
        id: "NB-010",
        barcode: "1111222311",
        name: "Notebook Apple MacBook Air M2",
        category: Notebook,
        brand: "Apple",
        model: "MacBook Air M2",
        serial_number: "AP-MBA-013",
        status: Available,
        location: STOCKROOM_A,
    },
    SeedEquipment {
        id: "MS-001",
        barcode: "9876543210",
        name: "Mouse Logitech MX Master 3",
        category: Mouse,
        brand: "Logitech",
        model: "MX Master 3",
        serial_number: "LG-MX3-002",
        status: InUse,
        location: "Maria Santos - Vendas",
    },
    SeedEquipment {
        id: "MS-002",
        barcode: "9876543221",
        name: "Mouse Logitech MX Master 3",
        category: Mouse,
        brand: "Logitech",
        model: "MX Master 3",
        serial_number: "LG-MX3-014",
        status: Available,
        location: STOCKROOM_B,
    },
    SeedEquipment {
        id: "MS-003",
        barcode: "9876543232",
        name: "Mouse Logitech M720",
        category: Mouse,
        brand: "Logitech",
        model: "M720",
        serial_number: "LG-M720-015",
        status: Available,
        location: STOCKROOM_B,
    },
    SeedEquipment {
        id: "MS-004",
        barcode: "9876543243",
        name: "Mouse Microsoft Bluetooth",
        category: Mouse,
        brand: "Microsoft",
        model: "Bluetooth Mouse",
        serial_number: "MS-BT-016",
        status: Available,
        location: STOCKROOM_B,
    },
    SeedEquipment {
        id: "MS-005",
        barcode: "9876543254",
        name: "Mouse Microsoft Bluetooth",
        category: Mouse,
        brand: "Microsoft",
        model: "Bluetooth Mouse",
        serial_number: "MS-BT-017",
        status: Available,
        location: STOCKROOM_B,
    },
    SeedEquipment {
        id: "KB-001",
        barcode: "7777888899",
        name: "Teclado Mecânico Corsair K95",
        category: Keyboard,
        brand: "Corsair",
        model: "K95 RGB",
        serial_number: "CR-K95-005",
        status: InUse,
        location: "Pedro Lima - Desenvolvimento",
    },
    SeedEquipment {
        id: "KB-002",
        barcode: "7777888800",
        name: "Teclado Logitech MX Keys",
        category: Keyboard,
        brand: "Logitech",
        model: "MX Keys",
        serial_number: "LG-MXK-018",
        status: Available,
        location: STOCKROOM_B,
    },
    SeedEquipment {
        id: "KB-003",
        barcode: "7777888811",
        name: "Teclado Logitech MX Keys",
        category: Keyboard,
        brand: "Logitech",
        model: "MX Keys",
        serial_number: "LG-MXK-019",
        status: Available,
        location: STOCKROOM_B,
    },
    SeedEquipment {
        id: "KB-004",
        barcode: "7777888822",
        name: "Teclado Dell KB216",
        category: Keyboard,
        brand: "Dell",
        model: "KB216",
        serial_number: "DL-KB216-020",
        status: Available,
        location: STOCKROOM_B,
    },
    SeedEquipment {
        id: "TB-001",
        barcode: "5555666677",
        name: "Tablet Samsung Galaxy Tab S9",
        category: Tablet,
        brand: "Samsung",
        model: "Galaxy Tab S9",
        serial_number: "SM-T970-003",
        status: Available,
        location: STOCKROOM_A,
    },
    SeedEquipment {
        id: "TB-002",
        barcode: "5555666688",
        name: "Tablet Samsung Galaxy Tab S9",
        category: Tablet,
        brand: "Samsung",
        model: "Galaxy Tab S9",
        serial_number: "SM-T970-021",
        status: InUse,
        location: "Carla Mendes - Marketing",
    },
    SeedEquipment {
        id: "TB-003",
        barcode: "5555666699",
        name: "Tablet Apple iPad 10",
        category: Tablet,
        brand: "Apple",
        model: "iPad 10",
        serial_number: "AP-IPAD-022",
        status: Available,
        location: STOCKROOM_A,
    },
    SeedEquipment {
        id: "MN-001",
        barcode: "3333444455",
        name: "Monitor Dell P2422H",
        category: Monitor,
        brand: "Dell",
        model: "P2422H",
        serial_number: "DL-P24-023",
        status: Available,
        location: STOCKROOM_B,
    },
    SeedEquipment {
        id: "MN-002",
        barcode: "3333444466",
        name: "Monitor LG 27UL500",
        category: Monitor,
        brand: "LG",
        model: "27UL500",
        serial_number: "LG-27UL-024",
        status: Available,
        location: STOCKROOM_B,
    },
];

const SEED_LOANS: &[SeedLoan] = &[
    SeedLoan {
        id: "LN-001",
        equipment_id: "NB-001",
        borrower_name: "João Silva",
        borrower_email: "joao.silva@empresa.com",
        department: "TI",
        loan_date: (2024, 6, 10),
        expected_return_date: (2024, 6, 24),
        actual_return_date: None,
    },
    SeedLoan {
        id: "LN-002",
        equipment_id: "MS-001",
        borrower_name: "Maria Santos",
        borrower_email: "maria.santos@empresa.com",
        department: "Vendas",
        loan_date: (2024, 6, 8),
        expected_return_date: (2024, 6, 15),
        actual_return_date: None,
    },
    SeedLoan {
        id: "LN-003",
        equipment_id: "TB-001",
        borrower_name: "Carlos Oliveira",
        borrower_email: "carlos.oliveira@empresa.com",
        department: "Marketing",
        loan_date: (2024, 6, 5),
        expected_return_date: (2024, 6, 12),
        actual_return_date: Some((2024, 6, 11)),
    },
    SeedLoan {
        id: "LN-004",
        equipment_id: "NB-002",
        borrower_name: "Ana Costa",
        borrower_email: "ana.costa@empresa.com",
        department: "Financeiro",
        loan_date: (2024, 6, 12),
        expected_return_date: (2024, 6, 26),
        actual_return_date: None,
    },
    SeedLoan {
        id: "LN-005",
        equipment_id: "KB-001",
        borrower_name: "Pedro Lima",
        borrower_email: "pedro.lima@empresa.com",
        department: "Desenvolvimento",
        loan_date: (2024, 6, 1),
        expected_return_date: (2024, 6, 8),
        actual_return_date: None,
    },
    SeedLoan {
        id: "LN-006",
        equipment_id: "NB-003",
        borrower_name: "Rafaela Souza",
        borrower_email: "rafaela.souza@empresa.com",
        department: "RH",
        loan_date: (2024, 6, 17),
        expected_return_date: (2024, 7, 1),
        actual_return_date: None,
    },
    SeedLoan {
        id: "LN-007",
        equipment_id: "TB-002",
        borrower_name: "Carla Mendes",
        borrower_email: "carla.mendes@empresa.com",
        department: "Marketing",
        loan_date: (2024, 6, 18),
        expected_return_date: (2024, 6, 28),
        actual_return_date: None,
    },
];

/// Date on which the demo dataset reproduces the dashboard headline counts.
pub fn demo_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 20).unwrap_or_default()
}

pub fn demo_inventory() -> Result<Inventory, DomainError> {
    let equipment = SEED_EQUIPMENT
        .iter()
        .map(|seed| Equipment {
            id: EquipmentId(seed.id.to_string()),
            barcode: seed.barcode.to_string(),
            name: seed.name.to_string(),
            category: seed.category,
            brand: seed.brand.to_string(),
            model: seed.model.to_string(),
            serial_number: seed.serial_number.to_string(),
            status: seed.status,
            location: seed.location.to_string(),
        })
        .collect();

    let loans = SEED_LOANS
        .iter()
        .map(|seed| {
            Ok(Loan {
                id: LoanId(seed.id.to_string()),
                equipment_id: EquipmentId(seed.equipment_id.to_string()),
                borrower_name: seed.borrower_name.to_string(),
                borrower_email: seed.borrower_email.to_string(),
                department: seed.department.to_string(),
                loan_date: seed_date(seed.loan_date)?,
                expected_return_date: seed_date(seed.expected_return_date)?,
                actual_return_date: seed.actual_return_date.map(seed_date).transpose()?,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    Inventory::new(equipment, loans)
}

fn seed_date((year, month, day): (i32, u32, u32)) -> Result<NaiveDate, DomainError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        DomainError::InvariantViolation(format!("invalid seed date {year}-{month:02}-{day:02}"))
    })
}
