use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    SlNo,
    Email,
    MobileNumber,
    LoginPassword,
    EmailPassword,
    AssignedPerson,
    IvacCenter,
    TotalBgdFile,
    FileStartingDate,
    FileSuccessDate,
    Note,
}

pub const ALL_FIELDS: [Field; 11] = [
    Field::SlNo,
    Field::Email,
    Field::MobileNumber,
    Field::LoginPassword,
    Field::EmailPassword,
    Field::AssignedPerson,
    Field::IvacCenter,
    Field::TotalBgdFile,
    Field::FileStartingDate,
    Field::FileSuccessDate,
    Field::Note,
];

// required for the add/update path, checked in this order
pub const INTERACTIVE_REQUIRED: [Field; 8] = [
    Field::SlNo,
    Field::Email,
    Field::MobileNumber,
    Field::LoginPassword,
    Field::AssignedPerson,
    Field::IvacCenter,
    Field::TotalBgdFile,
    Field::FileStartingDate,
];

// narrower than INTERACTIVE_REQUIRED so partial pastes still go through
pub const BULK_REQUIRED: [Field; 7] = [
    Field::SlNo,
    Field::Email,
    Field::MobileNumber,
    Field::LoginPassword,
    Field::IvacCenter,
    Field::TotalBgdFile,
    Field::FileStartingDate,
];

// positional cell order for pasted rows (no header row)
pub const PASTE_ORDER: [Field; 11] = [
    Field::SlNo,
    Field::Email,
    Field::MobileNumber,
    Field::LoginPassword,
    Field::EmailPassword,
    Field::IvacCenter,
    Field::AssignedPerson,
    Field::TotalBgdFile,
    Field::FileStartingDate,
    Field::FileSuccessDate,
    Field::Note,
];

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Self::SlNo => "slNo",
            Self::Email => "email",
            Self::MobileNumber => "mobileNumber",
            Self::LoginPassword => "loginPassword",
            Self::EmailPassword => "emailPassword",
            Self::AssignedPerson => "assignedPerson",
            Self::IvacCenter => "ivacCenter",
            Self::TotalBgdFile => "totalBgdFile",
            Self::FileStartingDate => "fileStartingDate",
            Self::FileSuccessDate => "fileSuccessDate",
            Self::Note => "note",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SlNo => "Serial Number",
            Self::Email => "Email",
            Self::MobileNumber => "Mobile Number",
            Self::LoginPassword => "Login Password",
            Self::EmailPassword => "Email Password",
            Self::AssignedPerson => "Assigned person for this BGD file",
            Self::IvacCenter => "IVAC Center",
            Self::TotalBgdFile => "Total BGD File",
            Self::FileStartingDate => "File Starting Date",
            Self::FileSuccessDate => "File Success Date",
            Self::Note => "Note",
        }
    }

    pub fn is_required(self) -> bool {
        INTERACTIVE_REQUIRED.contains(&self)
    }

    pub fn is_bulk_required(self) -> bool {
        BULK_REQUIRED.contains(&self)
    }

    /// Lookup by exact storage key.
    pub fn from_key(key: &str) -> Option<Self> {
        ALL_FIELDS.iter().copied().find(|f| f.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
