//! Fixed listing schema
//!
//! Every scraped listing becomes a [`Record`] with exactly the 25 columns
//! declared by [`Field`]. Columns that a detail page does not provide stay
//! as empty strings, so all rows in the output share the same shape.

use std::fmt;

/// Number of columns in a record
pub const FIELD_COUNT: usize = 25;

/// One column of the output table
///
/// Variants are declared in output column order. The label of each variant is
/// the Chinese caption used both as the CSV header and as the key in the
/// detail page attribute tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TotalPrice,
    UnitPrice,
    CommunityName,
    District,
    Layout,
    LayoutStructure,
    Floor,
    InnerArea,
    Orientation,
    Decoration,
    Elevator,
    BuildingArea,
    BuildingType,
    FloorHeight,
    BuildingStructure,
    ElevatorRatio,
    ListingDate,
    LastTransaction,
    PropertyAge,
    Mortgage,
    VerificationCode,
    TransactionOwnership,
    Usage,
    PropertyOwnership,
    DeedBackup,
}

impl Field {
    /// All fields in column order
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::TotalPrice,
        Field::UnitPrice,
        Field::CommunityName,
        Field::District,
        Field::Layout,
        Field::LayoutStructure,
        Field::Floor,
        Field::InnerArea,
        Field::Orientation,
        Field::Decoration,
        Field::Elevator,
        Field::BuildingArea,
        Field::BuildingType,
        Field::FloorHeight,
        Field::BuildingStructure,
        Field::ElevatorRatio,
        Field::ListingDate,
        Field::LastTransaction,
        Field::PropertyAge,
        Field::Mortgage,
        Field::VerificationCode,
        Field::TransactionOwnership,
        Field::Usage,
        Field::PropertyOwnership,
        Field::DeedBackup,
    ];

    /// Returns the column caption for this field
    pub fn label(&self) -> &'static str {
        match self {
            Self::TotalPrice => "房屋总价",
            Self::UnitPrice => "房屋单价",
            Self::CommunityName => "小区名称",
            Self::District => "所在区域",
            Self::Layout => "房屋户型",
            Self::LayoutStructure => "户型结构",
            Self::Floor => "所在楼层",
            Self::InnerArea => "套内面积",
            Self::Orientation => "房屋朝向",
            Self::Decoration => "装修情况",
            Self::Elevator => "配备电梯",
            Self::BuildingArea => "建筑面积",
            Self::BuildingType => "建筑类型",
            Self::FloorHeight => "楼层高度",
            Self::BuildingStructure => "建筑结构",
            Self::ElevatorRatio => "梯户比例",
            Self::ListingDate => "挂牌时间",
            Self::LastTransaction => "上次交易",
            Self::PropertyAge => "房屋年限",
            Self::Mortgage => "抵押信息",
            Self::VerificationCode => "房源核验码",
            Self::TransactionOwnership => "交易权属",
            Self::Usage => "房屋用途",
            Self::PropertyOwnership => "产权所属",
            Self::DeedBackup => "房本备件",
        }
    }

    /// Looks up a field by its exact caption
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.label() == label)
    }

    /// Position of this field in the output columns
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Column captions in output order
    pub fn labels() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(|field| field.label())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The values scraped for a single listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: [String; FIELD_COUNT],
}

impl Record {
    /// Creates a record with every field set to the empty string
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|_| String::new()),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Overwrites the value of a field
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Sets the field whose caption equals `label`
    ///
    /// Returns false, leaving the record untouched, when the label is not
    /// part of the schema.
    pub fn set_by_label(&mut self, label: &str, value: impl Into<String>) -> bool {
        match Field::from_label(label) {
            Some(field) => {
                self.set(field, value);
                true
            }
            None => false,
        }
    }

    /// Iterates `(field, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .zip(self.values.iter().map(String::as_str))
    }

    /// Values in column order, ready to be written as a row
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns true when no field carries a value
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    /// Number of fields that carry a value
    pub fn filled_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_empty()).count()
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}
