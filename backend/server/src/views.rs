//! # Views
//!
//! One [`View`] variant per page. Text coming from the store or a rejected
//! form was escaped on the way in, so it is written out as is. Anything else
//! that reaches the page goes through [`escape`].
use axum::response::{Html, IntoResponse, Response};

use crate::{
    models::{Category, CategoryId, Item, ItemSummary},
    utils::escape,
    validation::{CategoryForm, FieldError, ItemForm},
};

/// A category offered by the item form, ticked when the item references it.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChoice {
    pub category: Category,
    pub checked: bool,
}

pub fn mark_checked(categories: Vec<Category>, selected: &[CategoryId]) -> Vec<CategoryChoice> {
    categories
        .into_iter()
        .map(|category| CategoryChoice {
            checked: selected.contains(&category.id),
            category,
        })
        .collect()
}

#[derive(Debug)]
pub enum View {
    Index {
        category_count: usize,
        item_count: usize,
    },
    CategoryList {
        categories: Vec<Category>,
    },
    CategoryDetail {
        category: Category,
        items: Vec<ItemSummary>,
    },
    CategoryEdit {
        title: &'static str,
        form: Option<CategoryForm>,
        errors: Vec<FieldError>,
    },
    CategoryDelete {
        category: Category,
        items: Vec<ItemSummary>,
    },
    ItemList {
        items: Vec<ItemSummary>,
    },
    ItemDetail {
        item: Item,
        categories: Vec<Category>,
    },
    ItemEdit {
        title: &'static str,
        form: Option<ItemForm>,
        categories: Vec<CategoryChoice>,
        errors: Vec<FieldError>,
    },
    ItemDelete {
        item: Item,
        categories: Vec<Category>,
    },
    Error {
        status: u16,
        message: String,
    },
}

impl View {
    pub fn template(&self) -> &'static str {
        match self {
            View::Index { .. } => "index",
            View::CategoryList { .. } => "category_list",
            View::CategoryDetail { .. } => "category_detail",
            View::CategoryEdit { .. } => "category_form",
            View::CategoryDelete { .. } => "category_delete",
            View::ItemList { .. } => "item_list",
            View::ItemDetail { .. } => "item_detail",
            View::ItemEdit { .. } => "item_form",
            View::ItemDelete { .. } => "item_delete",
            View::Error { .. } => "error",
        }
    }

    pub fn title(&self) -> String {
        match self {
            View::Index { .. } => "Grocery List".to_string(),
            View::CategoryList { .. } => "Category List".to_string(),
            View::CategoryDetail { .. } => "Category Detail".to_string(),
            View::CategoryEdit { title, .. } | View::ItemEdit { title, .. } => title.to_string(),
            View::CategoryDelete { .. } => "Delete Category".to_string(),
            View::ItemList { .. } => "Item List".to_string(),
            View::ItemDetail { .. } => "Item Detail".to_string(),
            View::ItemDelete { .. } => "Delete Item".to_string(),
            View::Error { status, .. } => format!("Error {status}"),
        }
    }

    pub fn render(&self) -> String {
        let title = self.title();

        format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n",
                "<body data-template=\"{template}\">\n",
                "<nav><a href=\"/\">Home</a> <a href=\"/categories\">All categories</a> ",
                "<a href=\"/items\">All items</a> <a href=\"/category/create\">Create new category</a> ",
                "<a href=\"/item/create\">Create new item</a></nav>\n",
                "<main>\n<h1>{title}</h1>\n{content}</main>\n</body>\n</html>\n"
            ),
            title = title,
            template = self.template(),
            content = self.content(),
        )
    }

    fn content(&self) -> String {
        match self {
            View::Index {
                category_count,
                item_count,
            } => format!(
                "<ul>\n<li><strong>Categories:</strong> {category_count}</li>\n<li><strong>Items:</strong> {item_count}</li>\n</ul>\n"
            ),
            View::CategoryList { categories } => {
                if categories.is_empty() {
                    return "<p>There are no categories.</p>\n".to_string();
                }

                list(categories.iter().map(|c| link(&c.url(), &c.name)))
            }
            View::CategoryDetail { category, items } => {
                let mut html = category_fields(category);
                html.push_str("<h2>Items</h2>\n");
                html.push_str(&item_summaries(items, "This category has no items."));
                html.push_str(&format!(
                    "<p>{} {}</p>\n",
                    link(&format!("{}/update", category.url()), "Update category"),
                    link(&format!("{}/delete", category.url()), "Delete category"),
                ));
                html
            }
            View::CategoryEdit { form, errors, .. } => {
                let form = form.clone().unwrap_or_default();

                let mut html = String::from("<form method=\"POST\" action=\"\">\n");
                html.push_str(&text_input("name", "Name", &form.name, true));
                html.push_str(&text_input(
                    "description",
                    "Description",
                    &form.description,
                    false,
                ));
                html.push_str("<button type=\"submit\">Submit</button>\n</form>\n");
                html.push_str(&error_list(errors));
                html
            }
            View::CategoryDelete { category, items } => {
                let mut html = category_fields(category);
                if !items.is_empty() {
                    html.push_str(
                        "<p>These items reference this category and will keep a dangling reference:</p>\n",
                    );
                    html.push_str(&item_summaries(items, ""));
                }
                html.push_str("<p>Do you really want to delete this category?</p>\n");
                html.push_str(&format!(
                    "<form method=\"POST\" action=\"{}/delete\">\n<input type=\"hidden\" name=\"categoryid\" value=\"{}\">\n<button type=\"submit\">Delete</button>\n</form>\n",
                    category.url(),
                    category.id
                ));
                html
            }
            View::ItemList { items } => item_summaries(items, "There are no items."),
            View::ItemDetail { item, categories } => {
                let mut html = item_fields(item, categories);
                html.push_str(&format!(
                    "<p>{} {}</p>\n",
                    link(&format!("{}/update", item.url()), "Update item"),
                    link(&format!("{}/delete", item.url()), "Delete item"),
                ));
                html
            }
            View::ItemEdit {
                form,
                categories,
                errors,
                ..
            } => {
                let form = form.clone().unwrap_or_default();

                let mut html = String::from("<form method=\"POST\" action=\"\">\n");
                html.push_str(&text_input("name", "Name", &form.name, true));
                html.push_str(&text_input(
                    "description",
                    "Description",
                    &form.description,
                    false,
                ));
                html.push_str("<fieldset>\n<legend>Category</legend>\n");
                for choice in categories {
                    html.push_str(&format!(
                        "<label><input type=\"checkbox\" name=\"category\" value=\"{id}\"{checked}> {name}</label>\n",
                        id = choice.category.id,
                        checked = if choice.checked { " checked" } else { "" },
                        name = choice.category.name,
                    ));
                }
                html.push_str("</fieldset>\n");
                html.push_str(&text_input("price", "Price", &form.price, false));
                html.push_str(&text_input("amount", "Amount", &form.amount, true));
                html.push_str("<button type=\"submit\">Submit</button>\n</form>\n");
                html.push_str(&error_list(errors));
                html
            }
            View::ItemDelete { item, categories } => {
                let mut html = item_fields(item, categories);
                html.push_str("<p>Do you really want to delete this item?</p>\n");
                html.push_str(&format!(
                    "<form method=\"POST\" action=\"{}/delete\">\n<input type=\"hidden\" name=\"itemid\" value=\"{}\">\n<button type=\"submit\">Delete</button>\n</form>\n",
                    item.url(),
                    item.id
                ));
                html
            }
            View::Error { message, .. } => format!("<p>{}</p>\n", escape(message)),
        }
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        Html(self.render()).into_response()
    }
}

fn link(href: &str, text: &str) -> String {
    format!("<a href=\"{href}\">{text}</a>")
}

fn list(entries: impl Iterator<Item = String>) -> String {
    let mut html = String::from("<ul>\n");
    for entry in entries {
        html.push_str(&format!("<li>{entry}</li>\n"));
    }
    html.push_str("</ul>\n");
    html
}

fn item_summaries(items: &[ItemSummary], empty: &str) -> String {
    if items.is_empty() {
        return if empty.is_empty() {
            String::new()
        } else {
            format!("<p>{empty}</p>\n")
        };
    }

    list(
        items
            .iter()
            .map(|i| format!("{} ({})", link(&i.url(), &i.name), i.amount)),
    )
}

fn category_fields(category: &Category) -> String {
    let mut html = format!("<p><strong>Name:</strong> {}</p>\n", category.name);
    if let Some(description) = &category.description {
        html.push_str(&format!(
            "<p><strong>Description:</strong> {description}</p>\n"
        ));
    }
    html
}

fn item_fields(item: &Item, categories: &[Category]) -> String {
    let mut html = format!("<p><strong>Name:</strong> {}</p>\n", item.name);
    if let Some(description) = &item.description {
        html.push_str(&format!(
            "<p><strong>Description:</strong> {description}</p>\n"
        ));
    }

    let links: Vec<String> = categories.iter().map(|c| link(&c.url(), &c.name)).collect();
    html.push_str(&format!(
        "<p><strong>Category:</strong> {}</p>\n",
        if links.is_empty() {
            "None".to_string()
        } else {
            links.join(", ")
        }
    ));

    if let Some(price) = item.price {
        html.push_str(&format!("<p><strong>Price:</strong> {price:.2}</p>\n"));
    }
    html.push_str(&format!("<p><strong>Amount:</strong> {}</p>\n", item.amount));
    html
}

fn text_input(name: &str, label: &str, value: &str, required: bool) -> String {
    format!(
        "<label for=\"{name}\">{label}:</label>\n<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\"{required}>\n",
        required = if required { " required" } else { "" },
    )
}

fn error_list(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let mut html = String::from("<ul class=\"errors\">\n");
    for error in errors {
        html.push_str(&format!(
            "<li data-field=\"{}\">{}</li>\n",
            error.field, error.message
        ));
    }
    html.push_str("</ul>\n");
    html
}
