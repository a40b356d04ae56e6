//! # Form Validation
//!
//! Every form runs the same pipeline:
//! 1. Read the fields out of the decoded body and trim them
//! 2. Evaluate its checks in order, each one independently
//! 3. HTML-escape the text fields
//! 4. Either hand back a draft for the store, or the escaped form plus every
//!    failed check so the page can be rendered again
//!
//! Checks are plain data, a field name, a [`Rule`] and the message shown next
//! to the field. Only [`Rule::Required`] looks at empty values, the others
//! pass on empty input so a missing field reports once.
use crate::{
    models::{CATEGORY_NAME_MAX, Category, CategoryDraft, CategoryId, Item, ItemDraft},
    utils::{FormFields, escape, optional, parse_number, trim},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MaxChars(usize),
    Number,
    Identifier,
}

impl Rule {
    fn passes(self, value: &str) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            _ if value.is_empty() => true,
            Rule::MaxChars(max) => value.chars().count() <= max,
            Rule::Number => parse_number(value).is_some(),
            Rule::Identifier => value.parse::<CategoryId>().is_ok(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub field: &'static str,
    pub rule: Rule,
    pub message: &'static str,
}

const fn check(field: &'static str, rule: Rule, message: &'static str) -> Check {
    Check {
        field,
        rule,
        message,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

pub const CATEGORY_CHECKS: &[Check] = &[
    check("name", Rule::Required, "Category name required"),
    check(
        "name",
        Rule::MaxChars(CATEGORY_NAME_MAX),
        "Category name must be at most 20 characters",
    ),
];

pub const ITEM_CHECKS: &[Check] = &[
    check("name", Rule::Required, "Item must have a name"),
    check("category", Rule::Identifier, "Invalid category"),
    check("price", Rule::Number, "Invalid Price"),
    check("amount", Rule::Required, "There must be an amount"),
    check("amount", Rule::Number, "Amount must be a number"),
];

/// Lets [`validate`] read a form without knowing its shape.
pub trait Fields {
    fn values(&self, field: &str) -> Vec<&str>;
}

pub fn validate(form: &impl Fields, checks: &[Check]) -> Vec<FieldError> {
    let mut errors: Vec<FieldError> = Vec::new();

    for check in checks {
        let values = form.values(check.field);
        let passed = match check.rule {
            Rule::Required => values.first().is_some_and(|v| check.rule.passes(v)),
            rule => values.iter().all(|v| rule.passes(v)),
        };

        let error = FieldError {
            field: check.field,
            message: check.message,
        };

        if !passed && !errors.contains(&error) {
            errors.push(error);
        }
    }

    errors
}

/// A rejected submission: the sanitized form to show again and why.
#[derive(Debug, Clone)]
pub struct Invalid<F> {
    pub form: F,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
}

impl Fields for CategoryForm {
    fn values(&self, field: &str) -> Vec<&str> {
        match field {
            "name" => vec![self.name.as_str()],
            "description" => vec![self.description.as_str()],
            _ => Vec::new(),
        }
    }
}

impl CategoryForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            name: trim(fields.value("name").unwrap_or_default()),
            description: trim(fields.value("description").unwrap_or_default()),
        }
    }

    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
        }
    }

    fn escaped(self) -> Self {
        Self {
            name: escape(&self.name),
            description: escape(&self.description),
        }
    }

    pub fn submit(fields: &FormFields) -> Result<CategoryDraft, Invalid<Self>> {
        let form = Self::from_fields(fields);
        let errors = validate(&form, CATEGORY_CHECKS);
        let form = form.escaped();

        if !errors.is_empty() {
            return Err(Invalid { form, errors });
        }

        Ok(CategoryDraft {
            name: form.name,
            description: optional(form.description),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
    pub category: Vec<String>,
    pub price: String,
    pub amount: String,
}

impl Fields for ItemForm {
    fn values(&self, field: &str) -> Vec<&str> {
        match field {
            "name" => vec![self.name.as_str()],
            "description" => vec![self.description.as_str()],
            "category" => self.category.iter().map(String::as_str).collect(),
            "price" => vec![self.price.as_str()],
            "amount" => vec![self.amount.as_str()],
            _ => Vec::new(),
        }
    }
}

impl ItemForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            name: trim(fields.value("name").unwrap_or_default()),
            description: trim(fields.value("description").unwrap_or_default()),
            category: fields
                .values("category")
                .into_iter()
                .map(trim)
                .filter(|id| !id.is_empty())
                .collect(),
            price: trim(fields.value("price").unwrap_or_default()),
            amount: trim(fields.value("amount").unwrap_or_default()),
        }
    }

    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            category: item.category.iter().map(ToString::to_string).collect(),
            price: item.price.map(|p| p.to_string()).unwrap_or_default(),
            amount: item.amount.to_string(),
        }
    }

    /// Selected categories that parse as ids, used to tick the checkboxes.
    pub fn selected(&self) -> Vec<CategoryId> {
        self.category.iter().filter_map(|id| id.parse().ok()).collect()
    }

    fn escaped(self) -> Self {
        Self {
            name: escape(&self.name),
            description: escape(&self.description),
            category: self.category.iter().map(|c| escape(c)).collect(),
            price: escape(&self.price),
            amount: escape(&self.amount),
        }
    }

    fn draft(&self) -> Option<ItemDraft> {
        let category = self
            .category
            .iter()
            .map(|id| id.parse().ok())
            .collect::<Option<Vec<CategoryId>>>()?;

        let price = match self.price.as_str() {
            "" => None,
            price => Some(parse_number(price)?),
        };

        Some(ItemDraft {
            name: self.name.clone(),
            description: optional(self.description.clone()),
            category,
            price,
            amount: parse_number(&self.amount)?,
        })
    }

    pub fn submit(fields: &FormFields) -> Result<ItemDraft, Invalid<Self>> {
        let form = Self::from_fields(fields);
        let errors = validate(&form, ITEM_CHECKS);
        let form = form.escaped();

        match form.draft() {
            Some(draft) if errors.is_empty() => Ok(draft),
            _ => {
                debug_assert!(!errors.is_empty(), "item rejected without a message");
                Err(Invalid { form, errors })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemId;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn messages(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.message).collect()
    }

    #[test]
    fn test_category_name_bounds() {
        for name in ["D", "Dairy", "Frozen", "abcdefghijklmnopqrst"] {
            let draft = CategoryForm::submit(&fields(&[("name", name)])).unwrap();
            assert_eq!(draft.name, name);
            assert_eq!(draft.description, None);
        }

        let empty = CategoryForm::submit(&fields(&[("name", "")])).unwrap_err();
        assert_eq!(empty.errors[0].field, "name");
        assert_eq!(messages(&empty.errors), ["Category name required"]);

        let blank = CategoryForm::submit(&fields(&[("name", "    ")])).unwrap_err();
        assert_eq!(messages(&blank.errors), ["Category name required"]);

        let missing = CategoryForm::submit(&fields(&[])).unwrap_err();
        assert_eq!(messages(&missing.errors), ["Category name required"]);

        let long = CategoryForm::submit(&fields(&[("name", "abcdefghijklmnopqrstu")])).unwrap_err();
        assert_eq!(
            messages(&long.errors),
            ["Category name must be at most 20 characters"]
        );
    }

    #[test]
    fn test_category_length_counts_characters_before_escaping() {
        let draft = CategoryForm::submit(&fields(&[("name", "  Fruit & Veg  ")])).unwrap();
        assert_eq!(draft.name, "Fruit &amp; Veg");

        let draft = CategoryForm::submit(&fields(&[("name", "Épicerie fine")])).unwrap();
        assert_eq!(draft.name, "Épicerie fine");
    }

    #[test]
    fn test_invalid_category_keeps_submitted_values() {
        let invalid = CategoryForm::submit(&fields(&[
            ("name", ""),
            ("description", " <fresh> "),
        ]))
        .unwrap_err();

        assert_eq!(invalid.form.description, "&lt;fresh&gt;");
    }

    #[test]
    fn test_item_minimal() {
        let draft = ItemForm::submit(&fields(&[("name", "Milk"), ("amount", "2")])).unwrap();

        assert_eq!(draft.name, "Milk");
        assert_eq!(draft.amount, 2.0);
        assert_eq!(draft.price, None);
        assert_eq!(draft.description, None);
        assert!(draft.category.is_empty());
    }

    #[test]
    fn test_item_categories_single_or_many() {
        let a = CategoryId::new();
        let b = CategoryId::new();

        let single = ItemForm::submit(&fields(&[
            ("name", "Milk"),
            ("amount", "1"),
            ("category", a.to_string().as_str()),
        ]))
        .unwrap();
        assert_eq!(single.category, vec![a]);

        let many = ItemForm::submit(&fields(&[
            ("name", "Milk"),
            ("category", a.to_string().as_str()),
            ("category", b.to_string().as_str()),
            ("amount", "1"),
        ]))
        .unwrap();
        assert_eq!(many.category, vec![a, b]);
    }

    #[test]
    fn test_item_blank_category_is_not_a_selection() {
        let draft = ItemForm::submit(&fields(&[
            ("name", "Milk"),
            ("amount", "2"),
            ("category", ""),
            ("category", "   "),
        ]))
        .unwrap();
        assert!(draft.category.is_empty());

        let a = CategoryId::new();
        let draft = ItemForm::submit(&fields(&[
            ("name", "Milk"),
            ("amount", "2"),
            ("category", ""),
            ("category", a.to_string().as_str()),
        ]))
        .unwrap();
        assert_eq!(draft.category, vec![a]);
    }

    #[test]
    fn test_item_rejection_always_has_a_message() {
        let submissions: &[&[(&str, &str)]] = &[
            &[],
            &[("name", "Milk"), ("amount", "2"), ("category", "x")],
            &[("name", "Milk"), ("amount", "2"), ("price", "free")],
            &[("name", "Milk"), ("amount", "a lot")],
            &[("amount", "2"), ("category", " ")],
        ];

        for pairs in submissions {
            let invalid = ItemForm::submit(&fields(pairs)).unwrap_err();
            assert!(!invalid.errors.is_empty(), "no message for {pairs:?}");
        }
    }

    #[test]
    fn test_item_missing_amount() {
        let invalid = ItemForm::submit(&fields(&[("name", "Milk")])).unwrap_err();

        assert_eq!(messages(&invalid.errors), ["There must be an amount"]);
        assert_eq!(invalid.form.name, "Milk");
    }

    #[test]
    fn test_item_reports_every_failure_once() {
        let invalid = ItemForm::submit(&fields(&[
            ("category", "nope"),
            ("category", "also-nope"),
            ("price", "cheap"),
            ("amount", "lots"),
        ]))
        .unwrap_err();

        assert_eq!(
            messages(&invalid.errors),
            [
                "Item must have a name",
                "Invalid category",
                "Invalid Price",
                "Amount must be a number",
            ]
        );
        assert_eq!(invalid.form.category, ["nope", "also-nope"]);
    }

    #[test]
    fn test_item_price() {
        let draft = ItemForm::submit(&fields(&[
            ("name", "Cheddar"),
            ("price", " 4.5 "),
            ("amount", "3"),
            ("description", "Aged 12 months"),
        ]))
        .unwrap();

        assert_eq!(draft.price, Some(4.5));
        assert_eq!(draft.description.as_deref(), Some("Aged 12 months"));
    }

    #[test]
    fn test_item_form_from_item() {
        let id = CategoryId::new();
        let form = ItemForm::from_item(&Item {
            id: ItemId::new(),
            name: "Milk".to_string(),
            description: None,
            category: vec![id],
            price: Some(1.25),
            amount: 2.0,
        });

        assert_eq!(form.amount, "2");
        assert_eq!(form.price, "1.25");
        assert_eq!(form.selected(), vec![id]);
    }
}
