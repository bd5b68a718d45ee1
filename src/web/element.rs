//! [`HostElement`] for `web_sys::HtmlElement`.

use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, HtmlElement};

use crate::error::{Result, StickyError};
use crate::host::{HostElement, Offset};

fn to_html(value: impl JsCast) -> Result<HtmlElement> {
    value
        .dyn_into::<HtmlElement>()
        .map_err(|_| StickyError::Host("node is not an HTML element".into()))
}

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| StickyError::Host("no window".into()))
}

fn computed_style(element: &HtmlElement) -> Result<CssStyleDeclaration> {
    window()?
        .get_computed_style(element)?
        .ok_or_else(|| StickyError::Host("no computed style".into()))
}

/// Parse a computed length such as `"12.5px"`; anything else counts as zero.
fn css_px(style: &CssStyleDeclaration, property: &str) -> f64 {
    style
        .get_property_value(property)
        .ok()
        .and_then(|v| v.trim_end_matches("px").parse().ok())
        .unwrap_or(0.0)
}

impl HostElement for HtmlElement {
    fn rows(&self) -> Result<Vec<Self>> {
        let list = self.query_selector_all("tr")?;
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(to_html)
            .collect()
    }

    fn children(&self) -> Result<Vec<Self>> {
        let collection = web_sys::Element::children(self);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .map(to_html)
            .collect()
    }

    fn data(&self, key: &str) -> Option<String> {
        self.dataset().get(key)
    }

    fn set_data(&self, key: &str, value: &str) -> Result<()> {
        self.dataset().set(key, value)?;
        Ok(())
    }

    fn remove_data(&self, key: &str) -> Result<()> {
        self.dataset().delete(key);
        Ok(())
    }

    fn class_name(&self) -> Option<String> {
        self.get_attribute("class")
    }

    fn set_class_name(&self, class: &str) -> Result<()> {
        web_sys::Element::set_class_name(self, class);
        Ok(())
    }

    fn set_style(&self, property: &str, value: &str) -> Result<()> {
        self.style().set_property(property, value)?;
        Ok(())
    }

    fn outer_width(&self) -> Result<f64> {
        Ok(self.get_bounding_client_rect().width())
    }

    fn outer_height(&self) -> Result<f64> {
        Ok(self.get_bounding_client_rect().height())
    }

    fn inner_width(&self) -> Result<f64> {
        Ok(f64::from(self.client_width()))
    }

    fn width(&self) -> Result<f64> {
        let style = computed_style(self)?;
        let padding = css_px(&style, "padding-left") + css_px(&style, "padding-right");
        Ok((f64::from(self.client_width()) - padding).max(0.0))
    }

    fn height(&self) -> Result<f64> {
        let style = computed_style(self)?;
        let padding = css_px(&style, "padding-top") + css_px(&style, "padding-bottom");
        Ok((f64::from(self.client_height()) - padding).max(0.0))
    }

    fn offset(&self) -> Result<Offset> {
        let window = window()?;
        let rect = self.get_bounding_client_rect();
        Ok(Offset::new(
            rect.top() + window.scroll_y()?,
            rect.left() + window.scroll_x()?,
        ))
    }

    fn deep_clone(&self) -> Result<Self> {
        to_html(self.clone_node_with_deep(true)?)
    }

    fn create_element(&self, tag: &str) -> Result<Self> {
        let document = self
            .owner_document()
            .ok_or_else(|| StickyError::Host("element has no owner document".into()))?;
        to_html(document.create_element(tag)?)
    }

    fn insert_before(&self, node: &Self) -> Result<()> {
        let parent = self
            .parent_node()
            .ok_or_else(|| StickyError::Host("table has no parent".into()))?;
        let anchor: &web_sys::Node = self;
        parent.insert_before(node, Some(anchor))?;
        Ok(())
    }

    fn append_child(&self, child: &Self) -> Result<()> {
        web_sys::Node::append_child(self, child)?;
        Ok(())
    }

    fn clear_children(&self) -> Result<()> {
        self.set_text_content(None);
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        web_sys::Element::remove(self);
        Ok(())
    }

    fn show(&self) -> Result<()> {
        self.style().remove_property("display")?;
        Ok(())
    }

    fn hide(&self) -> Result<()> {
        self.style().set_property("display", "none")?;
        Ok(())
    }

    fn is_visible(&self) -> Result<bool> {
        Ok(self.get_client_rects().length() > 0)
    }

    fn same_node(&self, other: &Self) -> bool {
        let other: &web_sys::Node = other;
        self.is_same_node(Some(other))
    }
}
