/*
 * Built-in Listener Catalog
 *
 * Common framework callback interfaces keyed by fully-qualified name
 * (nested interfaces use `.`: `android.view.View.OnClickListener`).
 */

use rustc_hash::FxHashMap;

use crate::features::callbacks::domain::ListenerInterface;
use crate::shared::models::{MethodSignature, TypeName};

const VIEW: &str = "android.view.View";

#[derive(Debug, Clone)]
pub struct ListenerCatalog {
    interfaces: FxHashMap<TypeName, ListenerInterface>,
}

impl ListenerCatalog {
    pub fn empty() -> Self {
        Self {
            interfaces: FxHashMap::default(),
        }
    }

    pub fn android() -> Self {
        let mut catalog = Self::empty();

        // View events
        catalog.register(ListenerInterface::new("android.view.View.OnClickListener").method("onClick", &[VIEW]));
        catalog.register(
            ListenerInterface::new("android.view.View.OnLongClickListener").method("onLongClick", &[VIEW]),
        );
        catalog.register(
            ListenerInterface::new("android.view.View.OnTouchListener")
                .method("onTouch", &[VIEW, "android.view.MotionEvent"]),
        );
        catalog.register(
            ListenerInterface::new("android.view.View.OnKeyListener")
                .method("onKey", &[VIEW, "int", "android.view.KeyEvent"]),
        );
        catalog.register(
            ListenerInterface::new("android.view.View.OnFocusChangeListener")
                .method("onFocusChange", &[VIEW, "boolean"]),
        );
        catalog.register(
            ListenerInterface::new("android.widget.CompoundButton.OnCheckedChangeListener")
                .method("onCheckedChanged", &["android.widget.CompoundButton", "boolean"]),
        );
        catalog.register(
            ListenerInterface::new("android.widget.AdapterView.OnItemClickListener")
                .method("onItemClick", &["android.widget.AdapterView", VIEW, "int", "long"]),
        );
        catalog.register(
            ListenerInterface::new("android.widget.AdapterView.OnItemSelectedListener")
                .method("onItemSelected", &["android.widget.AdapterView", VIEW, "int", "long"])
                .method("onNothingSelected", &["android.widget.AdapterView"]),
        );
        catalog.register(
            ListenerInterface::new("android.text.TextWatcher")
                .method("beforeTextChanged", &["java.lang.CharSequence", "int", "int", "int"])
                .method("onTextChanged", &["java.lang.CharSequence", "int", "int", "int"])
                .method("afterTextChanged", &["android.text.Editable"]),
        );

        // Surfaces
        catalog.register(
            ListenerInterface::new("android.view.SurfaceHolder.Callback")
                .method("surfaceCreated", &["android.view.SurfaceHolder"])
                .method("surfaceChanged", &["android.view.SurfaceHolder", "int", "int", "int"])
                .method("surfaceDestroyed", &["android.view.SurfaceHolder"]),
        );

        // Dialogs and preferences
        catalog.register(
            ListenerInterface::new("android.content.DialogInterface.OnClickListener")
                .method("onClick", &["android.content.DialogInterface", "int"]),
        );
        catalog.register(
            ListenerInterface::new("android.content.SharedPreferences.OnSharedPreferenceChangeListener")
                .method(
                    "onSharedPreferenceChanged",
                    &["android.content.SharedPreferences", "java.lang.String"],
                ),
        );

        // Process-level callbacks
        catalog.register(
            ListenerInterface::new("android.content.ComponentCallbacks")
                .method("onConfigurationChanged", &["android.content.res.Configuration"])
                .method("onLowMemory", &[]),
        );
        catalog.register(
            ListenerInterface::new("android.content.ComponentCallbacks2")
                .method("onConfigurationChanged", &["android.content.res.Configuration"])
                .method("onLowMemory", &[])
                .method("onTrimMemory", &["int"]),
        );

        // Hardware
        catalog.register(
            ListenerInterface::new("android.hardware.Camera.PictureCallback")
                .method("onPictureTaken", &["byte[]", "android.hardware.Camera"]),
        );
        catalog.register(
            ListenerInterface::new("android.hardware.Camera.PreviewCallback")
                .method("onPreviewFrame", &["byte[]", "android.hardware.Camera"]),
        );
        catalog.register(
            ListenerInterface::new("android.hardware.Camera.ShutterCallback").method("onShutter", &[]),
        );
        catalog.register(
            ListenerInterface::new("android.location.LocationListener")
                .method("onLocationChanged", &["android.location.Location"])
                .method("onStatusChanged", &["java.lang.String", "int", "android.os.Bundle"])
                .method("onProviderEnabled", &["java.lang.String"])
                .method("onProviderDisabled", &["java.lang.String"]),
        );
        catalog.register(
            ListenerInterface::new("android.hardware.SensorEventListener")
                .method("onSensorChanged", &["android.hardware.SensorEvent"])
                .method("onAccuracyChanged", &["android.hardware.Sensor", "int"]),
        );

        catalog.register(ListenerInterface::new("java.lang.Runnable").method("run", &[]));

        catalog
    }

    pub fn register(&mut self, interface: ListenerInterface) {
        self.interfaces.insert(interface.name.clone(), interface);
    }

    pub fn get(&self, name: &TypeName) -> Option<&ListenerInterface> {
        self.interfaces.get(name)
    }

    /// Methods of `interface`; empty for unknown interfaces
    pub fn methods_of(&self, interface: &TypeName) -> &[MethodSignature] {
        self.interfaces
            .get(interface)
            .map(|i| i.methods.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.interfaces.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

impl Default for ListenerCatalog {
    fn default() -> Self {
        Self::android()
    }
}
