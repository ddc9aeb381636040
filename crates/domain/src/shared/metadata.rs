use std::collections::HashMap;

/// Opaque key value bag carried by `Custom` and activity derived notifications
pub type Metadata = HashMap<String, String>;
