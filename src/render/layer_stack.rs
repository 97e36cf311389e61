use serde::{Deserialize, Serialize};

/// Canvas layers in back-to-front paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Grid,
    Series,
    Axis,
    Crosshair,
    Overlay,
}

impl CanvasLayerKind {
    /// All layers in paint order.
    pub const PAINT_ORDER: [Self; 5] = [
        Self::Grid,
        Self::Series,
        Self::Axis,
        Self::Crosshair,
        Self::Overlay,
    ];
}

#[cfg(test)]
mod tests {
    use super::CanvasLayerKind;

    #[test]
    fn crosshair_and_overlay_paint_above_series() {
        let order = CanvasLayerKind::PAINT_ORDER;
        let position = |kind| order.iter().position(|layer| *layer == kind);
        assert!(position(CanvasLayerKind::Grid) < position(CanvasLayerKind::Series));
        assert!(position(CanvasLayerKind::Series) < position(CanvasLayerKind::Crosshair));
        assert!(position(CanvasLayerKind::Crosshair) < position(CanvasLayerKind::Overlay));
    }
}
