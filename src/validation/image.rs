//! OS image reference validation.

use crate::crd::{AzureComputeGalleryImage, AzureMarketplaceImage, AzureSharedGalleryImage, Image};

use super::field::{ErrorList, FieldError, FieldPath};

/// Validate that an image names exactly one source and that source is complete.
pub fn validate_image(image: &Image, path: &FieldPath) -> ErrorList {
    if let Some(err) = validate_single_source(image, path) {
        return vec![err];
    }

    let mut errs = ErrorList::new();
    if let Some(id) = &image.id
        && id.trim().is_empty()
    {
        errs.push(FieldError::malformed(
            path.child("id"),
            id,
            "image ID must not be blank",
        ));
    }
    if let Some(marketplace) = &image.marketplace {
        errs.extend(validate_marketplace(marketplace, &path.child("marketplace")));
    }
    if let Some(gallery) = &image.shared_gallery {
        errs.extend(validate_shared_gallery(gallery, &path.child("sharedGallery")));
    }
    if let Some(gallery) = &image.compute_gallery {
        errs.extend(validate_compute_gallery(gallery, &path.child("computeGallery")));
    }
    errs
}

/// Reject images that set no source, or more than one.
fn validate_single_source(image: &Image, path: &FieldPath) -> Option<FieldError> {
    let sources = [
        ("id", image.id.is_some()),
        ("sharedGallery", image.shared_gallery.is_some()),
        ("marketplace", image.marketplace.is_some()),
        ("computeGallery", image.compute_gallery.is_some()),
    ];

    let mut found = false;
    for (name, set) in sources {
        if !set {
            continue;
        }
        if found {
            return Some(FieldError::forbidden(
                path.child(name),
                "only one of id, sharedGallery, marketplace or computeGallery may be specified",
            ));
        }
        found = true;
    }

    if !found {
        return Some(FieldError::required(
            path.clone(),
            "an id, sharedGallery, marketplace or computeGallery image must be specified",
        ));
    }
    None
}

fn require(errs: &mut ErrorList, value: &str, path: FieldPath) {
    if value.trim().is_empty() {
        errs.push(FieldError::required(path, ""));
    }
}

fn validate_marketplace(image: &AzureMarketplaceImage, path: &FieldPath) -> ErrorList {
    let mut errs = ErrorList::new();
    require(&mut errs, &image.publisher, path.child("publisher"));
    require(&mut errs, &image.offer, path.child("offer"));
    require(&mut errs, &image.sku, path.child("sku"));
    require(&mut errs, &image.version, path.child("version"));
    errs
}

fn validate_shared_gallery(image: &AzureSharedGalleryImage, path: &FieldPath) -> ErrorList {
    let mut errs = ErrorList::new();
    require(&mut errs, &image.subscription_id, path.child("subscriptionID"));
    require(&mut errs, &image.resource_group, path.child("resourceGroup"));
    require(&mut errs, &image.gallery, path.child("gallery"));
    require(&mut errs, &image.name, path.child("name"));
    require(&mut errs, &image.version, path.child("version"));
    errs
}

fn validate_compute_gallery(image: &AzureComputeGalleryImage, path: &FieldPath) -> ErrorList {
    let mut errs = ErrorList::new();
    require(&mut errs, &image.gallery, path.child("gallery"));
    require(&mut errs, &image.name, path.child("name"));
    require(&mut errs, &image.version, path.child("version"));
    errs
}
