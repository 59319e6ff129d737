//! Contract file records
//!
//! The contract file keeps cadences, intervals and dates in their textual
//! form. Records mirror the file one to one; conversion into the domain
//! parses those fields and reports failures with the contract and item they
//! belong to.

use core_kernel::temporal::{format_date, parse_date};
use core_kernel::{Cadence, CoreError, ValidityInterval};
use domain_billing::{BillingError, Contract, Item, Location};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One contract of the file; unknown keys are rejected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractRecord {
    #[serde(rename = "zakazka")]
    pub order_ref: String,
    #[serde(rename = "typ_dokladu")]
    pub document_type: String,
    #[serde(rename = "popis")]
    pub description: String,
    /// `dd.mm.yyyy - dd.mm.yyyy`, either side may be blank
    #[serde(rename = "platnost")]
    pub validity: String,
    /// `years,months,days`
    #[serde(rename = "frekvence")]
    pub cadence: String,
    #[serde(rename = "sleva", skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(rename = "polozky")]
    pub items: Vec<ItemRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ItemRecord {
    #[serde(rename = "nazev")]
    pub name: String,
    #[serde(rename = "cenik")]
    pub price_list: String,
    #[serde(rename = "mnozstvi")]
    pub quantity: f64,
    #[serde(rename = "cena")]
    pub unit_price: f64,
    #[serde(rename = "sleva", skip_serializing_if = "is_zero")]
    pub discount: f64,
    #[serde(rename = "platnost", skip_serializing_if = "Option::is_none")]
    pub validity: Option<String>,
    /// `dd.mm.yyyy`, absent or blank for an item never invoiced
    #[serde(rename = "vyfakturovano_do", skip_serializing_if = "Option::is_none")]
    pub last_invoiced: Option<String>,
    /// Blank inherits the contract cadence
    #[serde(rename = "frekvence", skip_serializing_if = "String::is_empty")]
    pub cadence: String,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// A blank cadence means "inherit", anything else must parse
fn parse_cadence(raw: &str) -> Result<Cadence, CoreError> {
    if raw.trim().is_empty() {
        Ok(Cadence::INHERIT)
    } else {
        raw.parse()
    }
}

fn parse_validity(raw: &str, location: &Location) -> Result<ValidityInterval, CoreError> {
    let validity: ValidityInterval = raw.parse()?;
    if !validity.is_ordered() {
        warn!(%location, validity = raw, "Validity ends before it starts");
    }
    Ok(validity)
}

impl ContractRecord {
    /// Parses the record into a domain contract
    pub fn into_domain(self) -> Result<Contract, BillingError> {
        let location = Location::contract(self.order_ref.as_str());
        let at = |e| BillingError::at(location.clone(), e);

        let validity = parse_validity(&self.validity, &location).map_err(at)?;
        let cadence = parse_cadence(&self.cadence).map_err(at)?;

        let items = self
            .items
            .into_iter()
            .map(|item| item.into_domain(&self.order_ref))
            .collect::<Result<Vec<_>, _>>()?;

        let contract = Contract {
            order_ref: self.order_ref.into(),
            document_type: self.document_type.into(),
            description: self.description,
            validity,
            cadence,
            discount: self.discount,
            items,
        };
        contract.validate()?;
        Ok(contract)
    }
}

impl ItemRecord {
    /// Parses the record into a domain item of contract `contract`
    pub fn into_domain(self, contract: &str) -> Result<Item, BillingError> {
        let location = Location::item(contract, self.name.as_str());
        let at = |e| BillingError::at(location.clone(), e);

        let validity = self
            .validity
            .as_deref()
            .map(|raw| parse_validity(raw, &location))
            .transpose()
            .map_err(at)?;
        let cadence = parse_cadence(&self.cadence).map_err(at)?;
        let last_invoiced = self
            .last_invoiced
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(parse_date)
            .transpose()
            .map_err(at)?;

        let item = Item {
            name: self.name,
            price_list: self.price_list.into(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount: self.discount,
            validity,
            cadence,
            last_invoiced,
        };
        item.validate(contract)?;
        Ok(item)
    }
}

impl From<&Contract> for ContractRecord {
    fn from(contract: &Contract) -> Self {
        Self {
            order_ref: contract.order_ref.to_string(),
            document_type: contract.document_type.to_string(),
            description: contract.description.clone(),
            validity: contract.validity.to_string(),
            cadence: contract.cadence.to_string(),
            discount: contract.discount,
            items: contract.items.iter().map(ItemRecord::from).collect(),
        }
    }
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            price_list: item.price_list.to_string(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount: item.discount,
            validity: item.validity.map(|validity| validity.to_string()),
            last_invoiced: item.last_invoiced.map(format_date),
            cadence: if item.cadence.is_inherit() {
                String::new()
            } else {
                item.cadence.to_string()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_cadence_inherits() {
        assert!(parse_cadence("").unwrap().is_inherit());
        assert!(parse_cadence("  ").unwrap().is_inherit());
        assert!(parse_cadence("0,0,0").unwrap().is_inherit());
    }

    #[test]
    fn test_blank_last_invoiced_means_never() {
        let record = ItemRecord {
            name: "New".to_string(),
            last_invoiced: Some(String::new()),
            ..Default::default()
        };
        let item = record.into_domain("TEST").unwrap();
        assert_eq!(item.last_invoiced, None);
    }

    #[test]
    fn test_unknown_item_key_is_rejected() {
        let result = serde_json::from_str::<ItemRecord>(r#"{"nazev": "Web", "vyfakturovano": "30.11.2016"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_keys() {
        let record = ContractRecord {
            order_ref: "TEST1".to_string(),
            discount: Some(20.0),
            items: vec![ItemRecord {
                name: "Web".to_string(),
                last_invoiced: Some("30.11.2016".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["zakazka"], "TEST1");
        assert_eq!(json["sleva"], 20.0);
        assert_eq!(json["polozky"][0]["nazev"], "Web");
        assert_eq!(json["polozky"][0]["vyfakturovano_do"], "30.11.2016");
        assert!(json["polozky"][0].get("sleva").is_none());
    }

    #[test]
    fn test_inherited_cadence_is_not_written() {
        let item = Item::new("Hosting", "HOST", 10.0);
        let record = ItemRecord::from(&item);
        assert!(record.cadence.is_empty());
        assert_eq!(record.validity, None);
    }
}
