//! Route labels for metrics and spans.

/// Collapse identifier segments so that label cardinality stays bounded,
/// e.g. `/api/orders/17` becomes `/api/orders/{id}`.
pub(super) fn route_label(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut label = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            label.push('/');
        }

        if segment.bytes().any(|byte| byte.is_ascii_digit()) {
            label.push_str("{id}");
        } else {
            label.push_str(segment);
        }
    }

    label
}
