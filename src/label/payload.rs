//! Purchase request body and response parsing.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::label::state::{AddressFields, LabelForm, PackageItem, PurchasedLabel};
use crate::services::ServiceError;

/// Body of the label purchase request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchasePayload {
    pub origin: AddressFields,
    pub destination: AddressFields,
    pub packages: Vec<PurchasePackage>,
}

/// One package as the purchase endpoint expects it: the package fields
/// without `id`/`items`, plus the chosen service and the packed products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchasePackage {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub weight: f64,
    pub service_id: Option<String>,
    /// One entry per unit, in item order.
    pub products: Vec<String>,
}

/// Assembles the purchase body from the current form.
pub fn build_purchase_payload(form: &LabelForm) -> PurchasePayload {
    let packages = form
        .packages
        .values
        .iter()
        .enumerate()
        .map(|(index, package)| PurchasePackage {
            fields: package.fields.clone(),
            weight: package.weight,
            service_id: form.rate(index).map(str::to_owned),
            products: expand_products(&package.items),
        })
        .collect();

    PurchasePayload {
        origin: form.origin.effective_address().clone(),
        destination: form.destination.effective_address().clone(),
        packages,
    }
}

/// `[{A, 2}, {B, 1}]` → `[A, A, B]`.
pub fn expand_products(items: &[PackageItem]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| std::iter::repeat(item.product_id.clone()).take(item.quantity as usize))
        .collect()
}

/// Reads the labels out of a purchase response.
///
/// Accepts either a bare array or an object with a `labels` array.
pub fn parse_labels(body: Value) -> Result<Vec<PurchasedLabel>, ServiceError> {
    let labels = match body {
        Value::Array(_) => body,
        Value::Object(mut object) => object.remove("labels").ok_or_else(|| {
            ServiceError::Malformed("purchase response has no labels".to_string())
        })?,
        other => {
            return Err(ServiceError::Malformed(format!(
                "unexpected purchase response: {other}"
            )))
        }
    };

    serde_json::from_value(labels).map_err(|err| ServiceError::Malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::state::{AddressGroup, PackageEntry};
    use serde_json::json;

    fn item(product_id: &str, quantity: u32) -> PackageItem {
        PackageItem {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn expands_products_by_quantity_in_order() {
        let products = expand_products(&[item("A", 2), item("B", 1)]);
        assert_eq!(products, vec!["A", "A", "B"]);
    }

    #[test]
    fn zero_quantity_contributes_nothing() {
        assert!(expand_products(&[item("A", 0)]).is_empty());
    }

    #[test]
    fn payload_strips_internal_fields_and_adds_service() {
        let mut package = PackageEntry::new("pkg-1", 3.5, vec![item("A", 2)]);
        package.fields.insert("length".into(), json!(10));
        let form = LabelForm::new(AddressGroup::default(), AddressGroup::default(), vec![package])
            .with_rates(vec![Some("priority".into())]);

        let body = serde_json::to_value(build_purchase_payload(&form)).unwrap();
        let package = &body["packages"][0];
        assert_eq!(package["length"], 10);
        assert_eq!(package["weight"], 3.5);
        assert_eq!(package["service_id"], "priority");
        assert_eq!(package["products"], json!(["A", "A"]));
        assert!(package.get("id").is_none());
        assert!(package.get("items").is_none());
    }

    #[test]
    fn nan_weight_serializes_as_null() {
        let form = LabelForm::new(
            AddressGroup::default(),
            AddressGroup::default(),
            vec![PackageEntry::new("p", f64::NAN, vec![])],
        );
        let body = serde_json::to_value(build_purchase_payload(&form)).unwrap();
        assert!(body["packages"][0]["weight"].is_null());
        assert!(body["packages"][0]["service_id"].is_null());
    }

    #[test]
    fn parses_array_and_wrapped_labels() {
        let array = parse_labels(json!([{ "image": "AAA", "tracking": "1Z" }])).unwrap();
        assert_eq!(array[0].image, "AAA");
        assert_eq!(array[0].fields["tracking"], "1Z");

        let wrapped = parse_labels(json!({ "labels": [{ "image": "BBB" }] })).unwrap();
        assert_eq!(wrapped[0].image, "BBB");
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(matches!(
            parse_labels(json!({ "success": true })),
            Err(ServiceError::Malformed(_))
        ));
        assert!(matches!(
            parse_labels(json!("nope")),
            Err(ServiceError::Malformed(_))
        ));
    }
}
