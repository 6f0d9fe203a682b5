//! End-to-end rendering scenarios, driven through the public chart API.
